//! Bundled quotes and verses
//!
//! Used whenever a provider is unreachable or its response is unusable, so a
//! quote and verse are always available even fully offline.

use rand::Rng;

use super::{QuoteItem, VerseItem};

/// A bundled quote
#[derive(Debug, Clone, Copy)]
pub struct FallbackQuote {
    pub text: &'static str,
    pub author: &'static str,
}

/// A bundled verse
#[derive(Debug, Clone, Copy)]
pub struct FallbackVerse {
    pub text: &'static str,
    pub reference: &'static str,
}

impl FallbackQuote {
    pub fn to_item(&self) -> QuoteItem {
        QuoteItem {
            text: self.text.to_string(),
            author: self.author.to_string(),
        }
    }
}

impl FallbackVerse {
    pub fn to_item(&self) -> VerseItem {
        VerseItem {
            text: self.text.to_string(),
            reference: self.reference.to_string(),
        }
    }
}

/// Static array of fallback quotes
pub static FALLBACK_QUOTES: [FallbackQuote; 10] = [
    FallbackQuote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    FallbackQuote {
        text: "Life is what happens when you're busy making other plans.",
        author: "John Lennon",
    },
    FallbackQuote {
        text: "The future belongs to those who believe in the beauty of their dreams.",
        author: "Eleanor Roosevelt",
    },
    FallbackQuote {
        text: "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        author: "Winston Churchill",
    },
    FallbackQuote {
        text: "The journey of a thousand miles begins with one step.",
        author: "Lao Tzu",
    },
    FallbackQuote {
        text: "Believe you can and you're halfway there.",
        author: "Theodore Roosevelt",
    },
    FallbackQuote {
        text: "The best way to predict the future is to invent it.",
        author: "Alan Kay",
    },
    FallbackQuote {
        text: "Don't watch the clock; do what it does. Keep going.",
        author: "Sam Levenson",
    },
    FallbackQuote {
        text: "The only limit to our realization of tomorrow is our doubts of today.",
        author: "Franklin D. Roosevelt",
    },
    FallbackQuote {
        text: "What you get by achieving your goals is not as important as what you become by achieving your goals.",
        author: "Zig Ziglar",
    },
];

/// Static array of fallback verses
pub static FALLBACK_VERSES: [FallbackVerse; 10] = [
    FallbackVerse {
        text: "For I know the plans I have for you, declares the Lord, plans to prosper you and not to harm you, plans to give you hope and a future.",
        reference: "Jeremiah 29:11",
    },
    FallbackVerse {
        text: "I can do all things through Christ who strengthens me.",
        reference: "Philippians 4:13",
    },
    FallbackVerse {
        text: "Trust in the Lord with all your heart and lean not on your own understanding.",
        reference: "Proverbs 3:5",
    },
    FallbackVerse {
        text: "Be strong and courageous. Do not be afraid; do not be discouraged, for the Lord your God will be with you wherever you go.",
        reference: "Joshua 1:9",
    },
    FallbackVerse {
        text: "The Lord is my shepherd, I shall not want.",
        reference: "Psalm 23:1",
    },
    FallbackVerse {
        text: "Come to me, all you who are weary and burdened, and I will give you rest.",
        reference: "Matthew 11:28",
    },
    FallbackVerse {
        text: "Love is patient, love is kind. It does not envy, it does not boast, it is not proud.",
        reference: "1 Corinthians 13:4",
    },
    FallbackVerse {
        text: "But those who hope in the Lord will renew their strength. They will soar on wings like eagles.",
        reference: "Isaiah 40:31",
    },
    FallbackVerse {
        text: "The Lord is my light and my salvation\u{2014}whom shall I fear?",
        reference: "Psalm 27:1",
    },
    FallbackVerse {
        text: "Give thanks to the Lord, for he is good; his love endures forever.",
        reference: "Psalm 107:1",
    },
];

/// Picks a uniformly random fallback quote
pub fn random_quote() -> QuoteItem {
    let index = rand::rng().random_range(0..FALLBACK_QUOTES.len());
    FALLBACK_QUOTES[index].to_item()
}

/// Picks a uniformly random fallback verse
pub fn random_verse() -> VerseItem {
    let index = rand::rng().random_range(0..FALLBACK_VERSES.len());
    FALLBACK_VERSES[index].to_item()
}

/// Whether `quote` is one of the bundled fallback quotes
pub fn is_fallback_quote(quote: &QuoteItem) -> bool {
    FALLBACK_QUOTES
        .iter()
        .any(|q| q.text == quote.text && q.author == quote.author)
}

/// Whether `verse` is one of the bundled fallback verses
pub fn is_fallback_verse(verse: &VerseItem) -> bool {
    FALLBACK_VERSES
        .iter()
        .any(|v| v.text == verse.text && v.reference == verse.reference)
}
