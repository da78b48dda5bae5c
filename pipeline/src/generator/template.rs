//! Fixed vocabulary and membership used by the synthetic demo corpus.

use congresscore::calendar::Chamber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Republican,
    Democrat,
}

pub struct MemberTemplate {
    pub chamber: Chamber,
    pub state: &'static str,
    pub last: &'static str,
    pub first: &'static str,
    pub start: i64,
    pub party: Party,
}

const fn member(
    chamber: Chamber,
    state: &'static str,
    last: &'static str,
    first: &'static str,
    start: i64,
    party: Party,
) -> MemberTemplate {
    MemberTemplate {
        chamber,
        state,
        last,
        first,
        start,
        party,
    }
}

pub const MEMBERS: [MemberTemplate; 8] = [
    member(Chamber::House, "CA", "PELOSI", "NANCY", 1987, Party::Democrat),
    member(Chamber::House, "TX", "ARMEY", "DICK", 1985, Party::Republican),
    member(Chamber::House, "NY", "RANGEL", "CHARLES", 1971, Party::Democrat),
    member(Chamber::House, "IL", "HASTERT", "DENNIS", 1987, Party::Republican),
    member(Chamber::Senate, "KS", "DOLE", "ROBERT", 1969, Party::Republican),
    member(Chamber::Senate, "MA", "KENNEDY", "EDWARD", 1962, Party::Democrat),
    member(Chamber::Senate, "AZ", "MCCAIN", "JOHN", 1987, Party::Republican),
    member(Chamber::Senate, "WV", "BYRD", "ROBERT", 1959, Party::Democrat),
];

pub const REPUBLICAN_PHRASES: [(&str, &str); 6] = [
    ("tax", "relief"),
    ("border", "security"),
    ("government", "spending"),
    ("balanced", "budget"),
    ("national", "defense"),
    ("free", "enterprise"),
];

pub const DEMOCRAT_PHRASES: [(&str, &str); 6] = [
    ("working", "families"),
    ("civil", "rights"),
    ("minimum", "wage"),
    ("public", "education"),
    ("health", "care"),
    ("clean", "water"),
];

pub const NEUTRAL_PHRASES: [(&str, &str); 4] = [
    ("appropriations", "committee"),
    ("distinguished", "gentleman"),
    ("unanimous", "consent"),
    ("federal", "agencies"),
];

pub const FILLER_WORDS: [&str; 8] = [
    "today",
    "nation",
    "people",
    "support",
    "legislation",
    "country",
    "important",
    "colleagues",
];

pub const KEYWORD_CLOSING: &str = "May God bless America.";

pub const STOPWORDS: &str = " | A small English stop word list in Snowball format.\n\
i              |  personal pronoun\n\
we\n\
the\n\
of\n\
and\n\
to\n\
a\n\
in\n\
is\n\
that\n\
this\n\
for\n\
mr\n\
may\n\
i'll           |  contraction\n\
it's\n";
