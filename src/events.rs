//! Static event catalog shown to applicants. Not persisted; the
//! `selectedEvents` column stores the chosen names as free text.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Technical,
    NonTechnical,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EventInfo {
    pub name: &'static str,
    pub category: Category,
}

pub const CATALOG: &[EventInfo] = &[
    EventInfo {
        name: "Innovision – Ideathon",
        category: Category::Technical,
    },
    EventInfo {
        name: "Paper Vista – Paper Presentation",
        category: Category::Technical,
    },
    EventInfo {
        name: "Pixel Craft – UI / UX Design",
        category: Category::Technical,
    },
    EventInfo {
        name: "Prompt Studio – Prompt with AI",
        category: Category::Technical,
    },
    EventInfo {
        name: "The Hidden Hack – Blind Coding",
        category: Category::Technical,
    },
    EventInfo {
        name: "Mind Spark – Mind Tech",
        category: Category::Technical,
    },
    EventInfo {
        name: "IPL Auction",
        category: Category::NonTechnical,
    },
    EventInfo {
        name: "E-Sports",
        category: Category::NonTechnical,
    },
    EventInfo {
        name: "Dance",
        category: Category::NonTechnical,
    },
    EventInfo {
        name: "Song Composition",
        category: Category::NonTechnical,
    },
    EventInfo {
        name: "Connections",
        category: Category::NonTechnical,
    },
    EventInfo {
        name: "Photography",
        category: Category::NonTechnical,
    },
    EventInfo {
        name: "Technical Quiz",
        category: Category::NonTechnical,
    },
];
