pub mod export;

pub use export::{
    ExportChoiceSender, ExportOutcome, ExportPickerRequest, ExportService, ExportSurface,
};
