//! Transfer report formatting for `show-transactions`.

use std::io::Write;

use alloy::primitives::Address;

use crate::{error::Result, types::{format_amount, TransferRecord}};

/// Output format of the transfer report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// `<from> -> <to>: <amount> (<block>)`
    #[default]
    Plain,
    /// A Graphviz `digraph`, one edge per transfer.
    Graphviz,
}

/// Checksummed address, or its first 8 hex digits with `short`.
pub fn render_address(address: &Address, short: bool) -> String {
    let checksum = address.to_checksum(None);
    if short {
        checksum[2..10].to_string()
    } else {
        checksum
    }
}

/// A transfer as a `plain` report line.
pub fn plain_line(record: &TransferRecord, short: bool) -> String {
    format!(
        "{} -> {}: {} ({})",
        render_address(&record.from, short),
        render_address(&record.to, short),
        format_amount(record.value),
        record.block_number
    )
}

/// A transfer as a Graphviz edge.
pub fn graphviz_edge(record: &TransferRecord, short: bool) -> String {
    format!(
        "\"{}\" -> \"{}\" [label=\"{} ({})\"]",
        render_address(&record.from, short),
        render_address(&record.to, short),
        format_amount(record.value),
        record.block_number
    )
}

/// Streams report lines to `out`.
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
    short: bool,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat, short: bool) -> Self {
        Self { out, format, short }
    }

    /// Header, if the format has one.
    pub fn begin(&mut self) -> Result<()> {
        if self.format == OutputFormat::Graphviz {
            writeln!(self.out, "digraph Transfers {{")?;
        }
        Ok(())
    }

    pub fn write(&mut self, record: &TransferRecord) -> Result<()> {
        let line = match self.format {
            OutputFormat::Plain => plain_line(record, self.short),
            OutputFormat::Graphviz => graphviz_edge(record, self.short),
        };
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    /// Footer, if the format has one. Returns the writer.
    pub fn finish(mut self) -> Result<W> {
        if self.format == OutputFormat::Graphviz {
            writeln!(self.out, "}}")?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};

    const FROM: Address = address!("8ffD013B5E2F2D64bC6d5e8D1a7b0c7a9F4BA634");
    const TO: Address = address!("9F4BA634aE2F2D64bC6d5e8D1a7b0c7a8ffD013B");

    fn record(value: u128, block_number: u64) -> TransferRecord {
        TransferRecord { from: FROM, to: TO, value: U256::from(value), block_number }
    }

    #[test]
    fn test_render_address_short() {
        let short = render_address(&FROM, true);
        assert_eq!(short.len(), 8);
        assert_eq!(short, &FROM.to_checksum(None)[2..10]);
    }

    #[test]
    fn test_plain_line() {
        let line = plain_line(&record(1_000_000_000, 1194114), true);
        assert_eq!(
            line,
            format!(
                "{} -> {}: 1 Gwei (1194114)",
                &FROM.to_checksum(None)[2..10],
                &TO.to_checksum(None)[2..10]
            )
        );
    }

    #[test]
    fn test_plain_line_full_addresses() {
        let line = plain_line(&record(1, 7), false);
        assert_eq!(line, format!("{} -> {}: 1 wei (7)", FROM.to_checksum(None), TO.to_checksum(None)));
    }

    #[test]
    fn test_graphviz_edge() {
        let edge = graphviz_edge(&record(2_000_000_000_000_000_000_000, 1195554), true);
        assert_eq!(
            edge,
            format!(
                "\"{}\" -> \"{}\" [label=\"2000 ether (1195554)\"]",
                &FROM.to_checksum(None)[2..10],
                &TO.to_checksum(None)[2..10]
            )
        );
    }

    #[test]
    fn test_graphviz_document() {
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Graphviz, true);
        writer.begin().unwrap();
        writer.write(&record(1_500_000_000_000_000_000, 10)).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "digraph Transfers {");
        assert!(lines[1].ends_with("[label=\"1.5 ether (10)\"]"));
        assert_eq!(lines[2], "}");
    }

    #[test]
    fn test_plain_document_has_no_frame() {
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Plain, false);
        writer.begin().unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert!(out.is_empty());
    }
}
