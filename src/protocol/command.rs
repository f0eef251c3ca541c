#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    Flatten,
    Locate,
    Merge,
    Verify,
    DetectEncoding,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "flatten" | "index" => Command::Flatten,
            "locate" => Command::Locate,
            "merge" => Command::Merge,
            "verify" => Command::Verify,
            "detect_encoding" | "encoding.detect" => Command::DetectEncoding,
            _ => Command::Unknown,
        }
    }
}
