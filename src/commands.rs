pub mod combine;
pub mod extract_json;
pub mod extract_pdf;
pub mod migrate;
pub mod rename;
pub mod titles;
pub mod verify;
