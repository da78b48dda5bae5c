pub mod corpus;
pub mod template;
