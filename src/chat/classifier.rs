use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::query_defaults::{CHAT_ROVER, CHAT_SOL};

static MEDIA_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"image|video|audio").expect("valid media regex"));

static SPACE_TOPIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"nasa|space|planet|galaxy|telescope|moon|mars|earth|satellite|apollo|hubble|james webb|black hole|star|comet|asteroid|rover|launch|rocket|shuttle|station",
    )
    .expect("valid topic regex")
});

static MEDIA_TOPIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:image|images|video|audio|photo|picture) (?:of|about)? ([\w\s]+)")
        .expect("valid media topic regex")
});

static ROVER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(curiosity|opportunity|spirit)").expect("valid rover regex"));

static SOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)sol\s*(\d+)").expect("valid sol regex"));

/// Which NASA API a chat message is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Image/video/audio request about a space topic (NASA image library).
    Media,
    Mars,
    Neo,
    Eonet,
    /// Fallback for everything else.
    Apod,
}

/// Keyword intent detection. First match wins, in declaration order.
pub fn detect_intent(message: &str) -> Intent {
    let lower = message.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if MEDIA_WORD.is_match(&lower) && SPACE_TOPIC.is_match(&lower) {
        Intent::Media
    } else if has(&["mars", "rover"]) {
        Intent::Mars
    } else if has(&["asteroid", "neo", "comet"]) {
        Intent::Neo
    } else if has(&["event", "wildfire", "storm", "volcano"]) {
        Intent::Eonet
    } else {
        Intent::Apod
    }
}

/// Search topic for a media request: the words after "image of" / "video about"
/// etc., else the last three words of the message.
pub fn media_topic(message: &str) -> String {
    let topic = MEDIA_TOPIC
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    if !topic.is_empty() {
        return topic;
    }

    let words: Vec<&str> = message.trim().split(' ').collect();
    let start = words.len().saturating_sub(3);
    words[start..].join(" ")
}

/// Rover (lowercased) and sol mentioned in the message, with defaults.
pub fn rover_and_sol(message: &str) -> (String, String) {
    let rover = ROVER_NAME
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| CHAT_ROVER.to_string());
    let sol = SOL
        .captures(message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| CHAT_SOL.to_string());
    (rover, sol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_needs_a_space_topic() {
        assert_eq!(detect_intent("Show me an image of the moon"), Intent::Media);
        assert_eq!(detect_intent("any VIDEO about Hubble?"), Intent::Media);
        // "image" alone falls through to APOD.
        assert_eq!(detect_intent("image of my cat"), Intent::Apod);
    }

    #[test]
    fn mars_before_neo() {
        assert_eq!(detect_intent("What did the rover see?"), Intent::Mars);
        assert_eq!(detect_intent("asteroids near mars"), Intent::Mars);
    }

    #[test]
    fn neo_keywords() {
        assert_eq!(detect_intent("Any asteroid close today?"), Intent::Neo);
        assert_eq!(detect_intent("tell me about comets"), Intent::Neo);
    }

    #[test]
    fn eonet_keywords() {
        assert_eq!(detect_intent("Where are the wildfires?"), Intent::Eonet);
        assert_eq!(detect_intent("active volcano list"), Intent::Eonet);
    }

    #[test]
    fn apod_is_default() {
        assert_eq!(detect_intent("hello"), Intent::Apod);
        assert_eq!(detect_intent("picture of the day"), Intent::Apod);
    }

    #[test]
    fn topic_after_of() {
        assert_eq!(media_topic("Show me an image of the moon"), "the moon");
        assert_eq!(media_topic("images about black holes"), "black holes");
    }

    #[test]
    fn topic_falls_back_to_last_three_words() {
        assert_eq!(media_topic("nasa image: saturn rings closeup"), "saturn rings closeup");
        assert_eq!(media_topic("hubble"), "hubble");
    }

    #[test]
    fn rover_and_sol_extraction() {
        assert_eq!(
            rover_and_sol("Opportunity photos on sol 42"),
            ("opportunity".to_string(), "42".to_string())
        );
        assert_eq!(
            rover_and_sol("mars pictures please"),
            ("curiosity".to_string(), "1000".to_string())
        );
        assert_eq!(rover_and_sol("spirit SOL12").1, "12");
    }
}
