//! APRS-IS textual (TNC2 monitor format) line framing.
//!
//! Covers the frame line itself (`SRC>DEST[,PATH]:INFO`), the `#`-prefixed
//! server comment line, and the client login line.

use crate::callsign::Callsign;
use crate::error::AprsError;

/// A single line received from (or sent to) an APRS-IS connection.
#[derive(Debug, Clone, PartialEq)]
pub enum Tnc2Line {
    /// `#`-prefixed server comment/status line.
    Comment(String),
    /// `SRC>DEST[,PATH]:INFO`.
    Frame { source: Callsign, destination: Callsign, path: Vec<Callsign>, information: Vec<u8> },
}

/// Decode one TNC2 line, with any trailing CRLF/LF already stripped.
pub fn decode(line: &str) -> Result<Tnc2Line, AprsError> {
    if let Some(rest) = line.strip_prefix('#') {
        return Ok(Tnc2Line::Comment(rest.to_string()));
    }

    let colon = line
        .find(':')
        .ok_or_else(|| AprsError::MalformedLine { line: line.to_string() })?;
    let (header, body) = line.split_at(colon);
    let information = body[1..].as_bytes().to_vec();

    let arrow = header
        .find('>')
        .ok_or_else(|| AprsError::MalformedLine { line: line.to_string() })?;
    let (source_text, rest) = header.split_at(arrow);
    let source = Callsign::decode_textual(source_text)?;

    let mut parts = rest[1..].split(',');
    let destination_text = parts
        .next()
        .ok_or_else(|| AprsError::MalformedLine { line: line.to_string() })?;
    let destination = Callsign::decode_textual(destination_text)?;

    let mut path = Vec::new();
    for p in parts {
        path.push(Callsign::decode_textual(p)?);
    }

    Ok(Tnc2Line::Frame { source, destination, path, information })
}

/// Encode a TNC2 line (without a trailing CRLF; the caller appends line
/// framing appropriate to its transport).
pub fn encode(line: &Tnc2Line) -> String {
    match line {
        Tnc2Line::Comment(text) => format!("#{text}"),
        Tnc2Line::Frame { source, destination, path, information } => {
            let mut out = format!("{}>{}", source.encode_textual(), destination.encode_textual());
            for hop in path {
                out.push(',');
                out.push_str(&hop.encode_textual());
            }
            out.push(':');
            out.push_str(&String::from_utf8_lossy(information));
            out
        }
    }
}

/// Build an APRS-IS login line: `user CALL pass PASSCODE vers NAME
/// VERSION[ filter FILTER]`.
pub fn login_line(callsign: &Callsign, passcode: &str, software_name: &str, software_version: &str, filter: Option<&str>) -> String {
    let mut out = format!(
        "user {} pass {} vers {} {}",
        callsign.encode_textual(),
        passcode,
        software_name,
        software_version,
    );
    if let Some(filter) = filter {
        out.push_str(" filter ");
        out.push_str(filter);
    }
    out
}

/// Parse a login line sent by a client, extracting its fields for a
/// server-side consumer. Returns `None` if the line isn't a login line.
pub fn parse_login_line(line: &str) -> Option<(String, String, String, String, Option<String>)> {
    let rest = line.strip_prefix("user ")?;
    let (call, rest) = rest.split_once(" pass ")?;
    let (passcode, rest) = rest.split_once(" vers ")?;
    let (vers_rest, filter) = match rest.split_once(" filter ") {
        Some((vers, filter)) => (vers, Some(filter.to_string())),
        None => (rest, None),
    };
    let (name, version) = vers_rest.split_once(' ')?;

    ensure_nonempty(call)?;
    Some((call.to_string(), passcode.to_string(), name.to_string(), version.to_string(), filter))
}

fn ensure_nonempty(s: &str) -> Option<()> {
    if s.is_empty() {
        None
    } else {
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_frame_with_timestamp() {
        let line = "KF7HVM-2>APRS:/092345z4903.50N/07201.75W>Test";
        let decoded = decode(line).unwrap();
        match decoded {
            Tnc2Line::Frame { source, destination, path, information } => {
                assert_eq!(source.encode_textual(), "KF7HVM-2");
                assert_eq!(destination.encode_textual(), "APRS");
                assert!(path.is_empty());
                assert_eq!(information, b"/092345z4903.50N/07201.75W>Test");
            }
            _ => panic!("expected a frame"),
        }
    }

    #[test]
    fn round_trip_with_path() {
        let line = "KF7HVM-2>APRS,WIDE1-1,WIDE2-2:>Test";
        let decoded = decode(line).unwrap();
        assert_eq!(encode(&decoded), line);
    }

    #[test]
    fn decode_server_comment() {
        let decoded = decode("# javAPRSSrvr 4.1.8").unwrap();
        assert_eq!(decoded, Tnc2Line::Comment(" javAPRSSrvr 4.1.8".to_string()));
    }

    #[test]
    fn rejects_missing_colon() {
        assert!(decode("KF7HVM-2>APRS").is_err());
    }

    #[test]
    fn login_line_round_trip() {
        let call = Callsign::new("KF7HVM", 2, false).unwrap();
        let line = login_line(&call, "12345", "aprs-codec", "0.1.0", Some("r/49/-72/50"));
        assert_eq!(line, "user KF7HVM-2 pass 12345 vers aprs-codec 0.1.0 filter r/49/-72/50");
        let parsed = parse_login_line(&line).unwrap();
        assert_eq!(parsed.0, "KF7HVM-2");
        assert_eq!(parsed.1, "12345");
        assert_eq!(parsed.2, "aprs-codec");
        assert_eq!(parsed.3, "0.1.0");
        assert_eq!(parsed.4.as_deref(), Some("r/49/-72/50"));
    }

    #[test]
    fn login_line_without_filter() {
        let call = Callsign::new("KF7HVM", 0, false).unwrap();
        let line = login_line(&call, "12345", "aprs-codec", "0.1.0", None);
        let parsed = parse_login_line(&line).unwrap();
        assert_eq!(parsed.4, None);
    }
}
