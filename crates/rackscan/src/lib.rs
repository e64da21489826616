#![forbid(unsafe_code)]

//! `rackscan` recovers a typed inventory (racks, cooling, power, walls, doors, ...) from
//! data-center floor-plan SVGs that carry no semantic tags.
//!
//! # Features
//!
//! - `export`: enable the CSV report, annotated SVG and canvas JSON writers (`rackscan::export`)

pub use rackscan_core::*;

#[cfg(feature = "export")]
pub mod export {
    pub use rackscan_export::annotate::write_annotated_svg;
    pub use rackscan_export::fabric::{FabricDocument, fabric_document};
    pub use rackscan_export::konva::{KonvaDocument, konva_document};
    pub use rackscan_export::report::{Report, build_report};
    pub use rackscan_export::{normalize_color, to_json_string};

    use crate::{Scan, ScanOptions, Scanner};

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Load(#[from] rackscan_core::Error),
        #[error(transparent)]
        Export(#[from] rackscan_export::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ExportFormat {
        /// Inventory JSON.
        Inventory,
        ReportCsv,
        AnnotatedSvg,
        Konva,
        Fabric,
    }

    /// Writes an already scanned document. `source_file` is recorded in canvas JSON.
    pub fn export_scan(
        scan: &Scan,
        format: ExportFormat,
        source_file: &str,
        pretty: bool,
    ) -> Result<String> {
        let (tree, inv) = (&scan.tree, &scan.inventory);
        let out = match format {
            ExportFormat::Inventory => to_json_string(inv, pretty)?,
            ExportFormat::ReportCsv => build_report(inv).to_csv()?,
            ExportFormat::AnnotatedSvg => write_annotated_svg(tree, inv)?,
            ExportFormat::Konva => to_json_string(&konva_document(tree, inv, source_file), pretty)?,
            ExportFormat::Fabric => {
                to_json_string(&fabric_document(tree, inv, source_file), pretty)?
            }
        };
        Ok(out)
    }

    /// Loads, scans and writes `svg` in one call.
    pub fn export_str(
        svg: &str,
        options: ScanOptions,
        format: ExportFormat,
        source_file: &str,
        pretty: bool,
    ) -> Result<String> {
        let scan = Scanner::new().with_options(options).scan_str(svg)?;
        export_scan(&scan, format, source_file, pretty)
    }

}
