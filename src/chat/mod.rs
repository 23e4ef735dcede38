//! Keyword chatbot: classify the message, call one NASA API, answer in a
//! sentence.

pub mod classifier;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::fetcher::NasaClient;

pub use classifier::{detect_intent, media_topic, rover_and_sol, Intent};

/// Answer one chat message.
pub async fn reply(client: &NasaClient, message: &str) -> Result<String> {
    let intent = detect_intent(message);
    debug!(?intent, "chat intent");

    let reply = match intent {
        Intent::Media => {
            let topic = media_topic(message);
            let data = client.media_search(&topic).await?;
            media_reply(&topic, &data)
        }
        Intent::Mars => {
            let (rover, sol) = rover_and_sol(message);
            let data = client.mars_photos_by_sol(&rover, &sol).await?;
            mars_reply(&rover, &sol, &data)
        }
        Intent::Neo => neo_reply(&client.neo_feed(None).await?),
        Intent::Eonet => eonet_reply(&client.eonet_latest().await?),
        Intent::Apod => apod_reply(&client.apod(None).await?),
    };
    Ok(reply)
}

fn str_at<'a>(v: &'a Value, pointer: &str) -> Option<&'a str> {
    v.pointer(pointer).and_then(|s| s.as_str())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn media_reply(topic: &str, data: &Value) -> String {
    let Some(first) = data
        .pointer("/collection/items")
        .and_then(|i| i.as_array())
        .and_then(|i| i.first())
    else {
        return format!("Sorry, I couldn't find any NASA media results for \"{topic}\".");
    };

    let title = str_at(first, "/data/0/title").unwrap_or("NASA Media");
    let description = str_at(first, "/data/0/description").unwrap_or("");
    let link = str_at(first, "/links/0/href").unwrap_or("");
    format!("Here is a result for \"{topic}\": {title}. {description} {link}")
}

pub fn mars_reply(rover: &str, sol: &str, data: &Value) -> String {
    let rover = capitalize(rover);
    match data.get("photos").and_then(|p| p.as_array()) {
        Some(photos) if !photos.is_empty() => {
            let src = str_at(&photos[0], "/img_src").unwrap_or("");
            format!(
                "Found {} photos from {rover} on sol {sol}. Here is one: {src}",
                photos.len()
            )
        }
        _ => format!("No photos found for {rover} on sol {sol}. Try another sol or rover!"),
    }
}

pub fn neo_reply(feed: &Value) -> String {
    let count = feed.get("element_count").and_then(|c| c.as_u64()).unwrap_or(0);
    format!("There are {count} near-Earth objects in the current feed.")
}

pub fn eonet_reply(events: &Value) -> String {
    let count = events
        .get("events")
        .and_then(|e| e.as_array())
        .map_or(0, |e| e.len());
    format!("There are currently {count} natural events being tracked by NASA.")
}

pub fn apod_reply(apod: &Value) -> String {
    format!(
        "Astronomy Picture of the Day: {}. {}",
        str_at(apod, "/title").unwrap_or("Untitled"),
        str_at(apod, "/explanation").unwrap_or("")
    )
}
