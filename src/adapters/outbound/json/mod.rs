mod json_exporter;

pub use json_exporter::JsonExporter;
