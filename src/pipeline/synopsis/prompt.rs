//! Prompt construction for meeting synopsis generation.
//!
//! One fixed template. The extracted document text is embedded between
//! `---` fences so the model can tell instructions from content, and
//! the closing `Meeting Synopsis:` line anchors the completion.

/// Build the synopsis prompt around the extracted document text.
pub fn synopsis_prompt(document_text: &str) -> String {
    format!(
        "You are an AI assistant specialized in summarizing meeting notes.\n\
         Please read the following text extracted from a PDF document, which contains meeting information.\n\
         Your task is to provide a concise synopsis of the meeting.\n\
         Focus on:\n\
         - Main topics discussed.\n\
         - Key decisions made.\n\
         - Any specific action items or next steps.\n\
         - Important attendees or departments mentioned (if relevant and present).\n\n\
         Start with a '# ' title line. Use '## ' for section headings and '- ' for bullet points.\n\n\
         Here is the text from the PDF:\n\n\
         ---\n\
         {document_text}\n\
         ---\n\n\
         Meeting Synopsis:"
    )
}
