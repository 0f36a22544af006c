pub mod element_model;
pub mod extractor;
pub mod scan_context;
