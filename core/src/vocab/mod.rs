pub mod dictionary;
pub mod partisan;
pub mod stopwords;

pub use dictionary::Dictionary;
pub use partisan::{presence_matrix, PartisanRanking, PhraseScores};
pub use stopwords::StopwordList;
