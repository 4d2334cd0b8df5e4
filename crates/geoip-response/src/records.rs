//! Line-oriented record extraction.

use geoip_core::Record;

/// Lazily parse one record per `\n`-separated line of `text`.
///
/// A trailing `\r` is removed from each line. Lines that do not produce a
/// record, or produce an empty one, are skipped; the rest keep their order.
pub fn records<'a, R: Record + 'a>(text: &'a str) -> impl Iterator<Item = R> + 'a {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter_map(R::from_line)
        .filter(|record| !record.is_empty())
}

/// Parse every record in a decoded body. Invalid UTF-8 is replaced before
/// splitting.
pub fn parse_records<R: Record>(body: &[u8]) -> Vec<R> {
    records(&String::from_utf8_lossy(body)).collect()
}
