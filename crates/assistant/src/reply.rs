//! Reply post-processing — markdown cleanup and asset markers.
//!
//! The messaging client renders `*bold*` only, so the provider's markdown is
//! reduced to that. A reply may open with one of three markers asking for an
//! attachment; the marker is stripped from the text and returned separately.

use regex_lite::Regex;
use std::sync::LazyLock;

/// Sent when the provider returns nothing usable.
pub const EMPTY_REPLY: &str = "Halo 👋 Maaf, saya sedang kesulitan memproses pertanyaan Kakak. \
                               Bisa diulang lagi atau hubungi kami langsung ya? 😊";

/// Sent when generating a reply failed.
pub const TECHNICAL_ISSUE_REPLY: &str =
    "Maaf, ada kendala teknis. Mohon coba lagi atau hubungi kami langsung. 🙏";

/// Sent when the reply itself could not be delivered.
pub const DELIVERY_FAILED_REPLY: &str = "Maaf, ada kendala teknis. Mohon coba lagi. 🙏";

static DOUBLE_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid pattern"));
static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid pattern"));
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").expect("valid pattern"));
static STAR_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*{3,}").expect("valid pattern"));

static ALL_COLORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[SEND_ALL_COLORS:(.+?)\]").expect("valid pattern"));
static PRICE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[SEND_PRICELIST:(.+?)\]").expect("valid pattern"));
static IMAGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[SEND_IMAGE:(.+?)\]").expect("valid pattern"));

/// Reduce markdown to what the messaging client renders.
pub fn clean_markdown(text: &str) -> String {
    let text = DOUBLE_BOLD.replace_all(text, "*$1*");
    let text = CODE_BLOCK.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "$1");
    STAR_RUN.replace_all(&text, "*").into_owned()
}

/// An attachment request found in a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// Every colour photo of a model
    AllColors(String),
    /// The price-list image of a model
    PriceList(String),
    /// One photo of a model
    Image(String),
}

impl Marker {
    pub fn name(&self) -> &str {
        match self {
            Self::AllColors(name) | Self::PriceList(name) | Self::Image(name) => name,
        }
    }
}

/// Find the highest-precedence marker and strip every occurrence of its kind.
///
/// Precedence: all colours, then price list, then image. The text of a reply
/// without markers is returned as is.
pub fn extract_marker(reply: &str) -> (Option<Marker>, String) {
    let kinds: [(&Regex, fn(String) -> Marker); 3] = [
        (&*ALL_COLORS, Marker::AllColors),
        (&*PRICE_LIST, Marker::PriceList),
        (&*IMAGE, Marker::Image),
    ];

    for (pattern, make) in kinds {
        if let Some(caps) = pattern.captures(reply) {
            let name = caps.get(1).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
            let text = pattern.replace_all(reply, "").trim().to_string();
            return (Some(make(name)), text);
        }
    }

    (None, reply.to_string())
}
