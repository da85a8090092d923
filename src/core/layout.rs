use std::collections::BTreeMap;

use super::format::NumberFormat;

/// Document furniture shared by every invoice: header, footer and the
/// payment instructions per currency.
///
/// Currency keys are stored lowercase; lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutConfig {
    header_lines: Vec<String>,
    footer_lines: Vec<String>,
    payment_instructions: BTreeMap<String, String>,
    number_format: NumberFormat,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_line(mut self, line: impl Into<String>) -> Self {
        self.header_lines.push(line.into());
        self
    }

    pub fn footer_line(mut self, line: impl Into<String>) -> Self {
        self.footer_lines.push(line.into());
        self
    }

    /// Register the instruction text printed for invoices in `currency`.
    pub fn payment_instruction(
        mut self,
        currency: impl AsRef<str>,
        instruction: impl Into<String>,
    ) -> Self {
        self.payment_instructions
            .insert(currency.as_ref().to_lowercase(), instruction.into());
        self
    }

    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    pub fn header_lines(&self) -> &[String] {
        &self.header_lines
    }

    pub fn footer_lines(&self) -> &[String] {
        &self.footer_lines
    }

    pub fn payment_instructions(&self) -> &BTreeMap<String, String> {
        &self.payment_instructions
    }

    pub fn format(&self) -> NumberFormat {
        self.number_format
    }

    /// Instruction text for `currency`, matched case-insensitively.
    pub fn instruction_for(&self, currency: &str) -> Option<&str> {
        self.payment_instructions
            .get(&currency.to_lowercase())
            .map(String::as_str)
    }
}
