use crate::document::Document;
use crate::error::ModelResult;
use crate::front_matter::encode_front_matter;

impl Document {
    /// Render the document back to markdown.
    ///
    /// Header lines and body lines are replayed from their original text, so
    /// unedited content comes back byte-for-byte. Front matter is re-encoded.
    pub fn to_markdown(&self) -> ModelResult<String> {
        let mut output = String::new();

        if let Some(front_matter) = self.front_matter() {
            output.push_str(&encode_front_matter(front_matter)?);
        }

        for section in self.sections() {
            if let Some(header) = section.original_header_line() {
                output.push_str(header);
                output.push('\n');
            }
            for line in section.lines() {
                output.push_str(line.original_text());
                output.push('\n');
            }
        }

        Ok(output)
    }
}
