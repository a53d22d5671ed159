//! Natural language processing collaborators: sentence segmentation and the
//! Stanford CoreNLP OpenIE client, plus the triple wire format shared with
//! the extraction engine.

pub mod openie;
pub mod segment;
pub mod triples;
