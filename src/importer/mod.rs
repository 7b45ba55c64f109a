// ==========================================
// Importer layer
// ==========================================
// Spreadsheet import/export collaborator: the fixed-layout
// shipment-plan reader and the generic record exporter.
// ==========================================

pub mod error;
pub mod export;
pub mod shipment_reader;

pub use error::{ImportError, ImportResult};
pub use export::RecordExporter;
pub use shipment_reader::{ShipmentPlanReader, SHIPMENT_PLAN_COLUMNS};
