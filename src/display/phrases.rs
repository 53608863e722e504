//! Progress phrases for generation feedback.
//!
//! Hosts that want the playful status headings pick one per stage; the
//! texts themselves are part of the product voice and kept verbatim.

use uuid::Uuid;

pub const STARTING_PHRASES: &[&str] = &[
    "Phoning a friend 📲",
    "Reaching out to another data scientist 📊",
    "Just a little bit of data engineering will fix this 🔧",
    "Trying my best 💯",
    "Generating some code cells 💻",
    "Asking the internet 🌐",
    "Searching through my memory 💾",
    "What would a data analyst do? 🤔",
    "Querying my database 🗃️",
    "Running some tests 🏃‍",
    "One code cell, coming right up! 🚀",
    "I'm a machine, but I still enjoy helping you code. 😊",
];

pub const COMPLETION_PHRASES: &[&str] = &[
    "Enjoy your BRAND NEW CELL 🚙",
    "Just what you needed - more code cells! 🙌",
    "Here's to helping you code! 💻",
    "Ready, set, code! 🏁",
    "Coding, coding, coding... 🎵",
    "Just another code cell... 🙄",
    "Here's a code cell to help you with your analysis! 📊",
    "Need a code cell for your data engineering work? I got you covered! 🔥",
    "And now for something completely different - a code cell! 😜",
    "I got a little creative with this one - hope you like it! 🎨",
    "This one's for all the data nerds out there! 💙",
];

/// Heading shown above an error diagnosis.
pub const SUGGESTION_HEADING: &str = "Here's a way to fix this 🛠";

fn pick<'a>(phrases: &'a [&'a str]) -> &'a str {
    // Random enough for flavor text; avoids carrying an RNG dependency.
    let index = Uuid::new_v4().as_u128() as usize % phrases.len();
    phrases[index]
}

/// A markdown heading announcing that generation has started.
pub fn starting_message() -> String {
    format!("### {}", pick(STARTING_PHRASES))
}

/// A markdown heading celebrating a finished generation.
pub fn completion_message() -> String {
    format!("### {}", pick(COMPLETION_PHRASES))
}

/// The markdown heading for an error-diagnosis suggestion.
pub fn suggestion_heading() -> String {
    format!("### {SUGGESTION_HEADING}")
}
