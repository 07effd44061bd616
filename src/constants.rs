//! Application constants for the Rio Doce ETL
//!
//! This module contains namespaces, column names, status codes and the fixed
//! code tables shared by the extraction engine and the ingestion paths.

// =============================================================================
// Namespaces
// =============================================================================

/// Namespace IRIs used when asserting facts
pub mod namespaces {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const GUFO: &str = "http://purl.org/nemo/gufo#";
    pub const DOCE: &str = "http://purl.org/nemo/doce#";
    pub const INTEGRADOCE: &str = "http://purl.org/nemo/integradoce#";
    pub const WGS84: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";
    pub const UNIT: &str = "http://qudt.org/vocab/unit/";
}

// =============================================================================
// Input Dialect
// =============================================================================

/// Field delimiter of every spreadsheet export
pub const FIELD_DELIMITER: u8 = b';';

/// Default file pattern for data discovery
pub const DATA_FILE_PATTERN: &str = "*.csv";

/// Discovery descends into the root and its immediate sub-directories
pub const DISCOVERY_MAX_DEPTH: usize = 2;

// =============================================================================
// Renova Layouts
// =============================================================================

/// Status column bound to conductivity, only present in the automatic layout
pub const AUTOMATIC_DISCRIMINATOR: &str = "Status_Condutividade";

/// Status column bound to total alkalinity, only present in the manual layout
pub const MANUAL_DISCRIMINATOR: &str = "Status_Alcalinidade total";

/// Prefix carried by every status column name
pub const STATUS_COLUMN_PREFIX: &str = "Status";

/// Sampling point code column
pub const POINT_CODE_COLUMN: &str = "CodigoDoPonto";

/// Sampling date column (`dd/MM/yyyy`)
pub const SAMPLE_DATE_COLUMN: &str = "DataAmostra";

/// Sampling time column (`HH:mm`)
pub const SAMPLE_TIME_COLUMN: &str = "HoraAmostra";

/// Index of the sample matrix type cell in each row
pub const MATRIX_COLUMN_INDEX: usize = 0;

/// Matrix types admitted for the manual layout
pub const DEFAULT_ALLOWED_MATRICES: &[&str] = &["Agua", "Descarga_liquida"];

/// Marker used in the inclusion row of a header mapping resource
pub const INCLUSION_MARKER: &str = "x";

/// Number of metadata rows following the header of a mapping resource
pub const MAPPING_METADATA_ROWS: usize = 3;

/// Default mapping resource for the automatic layout
pub const AUTOMATIC_MAPPING_FILE: &str = "header-automatico.csv";

/// Default mapping resource for the manual layout
pub const MANUAL_MAPPING_FILE: &str = "header-manual.csv";

/// Default directory holding the mapping resources
pub const DEFAULT_MAPPING_DIR: &str = "resources";

// =============================================================================
// Status Codes
// =============================================================================

/// Per-cell status codes supplied by the Renova monitoring programme
pub mod status_codes {
    /// Parameter foreseen but not analysed
    pub const NOT_MEASURED: u8 = 0;

    /// Measured and validated
    pub const VALIDATED: u8 = 1;

    /// Measured but invalidated
    pub const INVALIDATED: u8 = 2;

    /// Result carries a qualifier
    pub const QUALIFIED: u8 = 3;

    /// Below the quantification limit
    pub const BELOW_QUANTIFICATION_LIMIT: u8 = 4;

    /// Above the maximum quantifiable limit
    pub const ABOVE_QUANTIFIABLE_LIMIT: u8 = 5;

    /// Parameter not applicable for this environment
    pub const NOT_APPLICABLE: u8 = 6;

    /// Codes whose cells yield a measurement
    pub const ACCEPTED: &[u8] = &[VALIDATED, BELOW_QUANTIFICATION_LIMIT, ABOVE_QUANTIFIABLE_LIMIT];
}

// =============================================================================
// UNESP Fixed Schema
// =============================================================================

/// Element code columns of the UNESP campaigns and their quantity kinds
///
/// Campaigns 1 and 2 split iron and aluminium into dissolved and total
/// fractions; campaigns 4 and 5 only report totals.
pub const FIXED_SCHEMA_QUANTITY_KINDS: &[(&str, &str)] = &[
    ("As", "doce:TotalArsenicConcentration"),
    ("Cd", "doce:TotalCadmiumConcentration"),
    ("Co", "doce:TotalCobaltConcentration"),
    ("Cu", "doce:TotalCopperConcentration"),
    ("Cr", "doce:TotalChromiumConcentration"),
    ("Mn", "doce:TotalManganeseConcentration"),
    ("Ni", "doce:TotalNickelConcentration"),
    ("Pb", "doce:TotalLeadConcentration"),
    ("Zn", "doce:TotalZincConcentration"),
    ("Fe-diss", "doce:DissolvedIronConcentration"),
    ("Fe-tot", "doce:TotalIronConcentration"),
    ("Fe", "doce:TotalIronConcentration"),
    ("Al-diss", "doce:DissolvedAluminiumConcentration"),
    ("Al-tot", "doce:TotalAluminiumConcentration"),
    ("Al", "doce:TotalAluminiumConcentration"),
];

/// Unit of every UNESP concentration column
pub const FIXED_SCHEMA_UNIT: &str = "unit:MilliGM-PER-L";

/// Fragment identifying the date column of the UNESP header
pub const FIXED_SCHEMA_DATE_MARKER: &str = "Data";

/// Fragment identifying the sample code column of the UNESP header
pub const FIXED_SCHEMA_SAMPLE_MARKER: &str = "Amostra";

/// Cell text UNESP uses for "not measured"
pub const FIXED_SCHEMA_MISSING_VALUE: &str = "-";

/// Prefix applied to UNESP point codes to keep them apart from Renova codes
pub const UNESP_POINT_PREFIX: &str = "UNESP_";

// =============================================================================
// Geographic Metadata Files
// =============================================================================

/// Renova point metadata columns
pub mod renova_points {
    pub const CODE: &str = "CODIGO_PONTO";
    pub const NAME: &str = "NOME_PONTO";
    pub const DESCRIPTION: &str = "DESCRICAO_PONTO";
    /// Misspelt in the Renova export
    pub const LATITUDE: &str = "LATITUTE";
    pub const LONGITUDE: &str = "LONGITUDE";
}

/// Header fragment of the UNESP point metadata file
pub const UNESP_POINTS_MARKER: &str = "ID amostras";

// =============================================================================
// Time Defaults
// =============================================================================

/// Time-of-day substituted when a row carries no time
pub const DEFAULT_SAMPLE_TIME: &str = "12:00";

/// UTC offset of the source timestamps (Brasília time)
pub const DEFAULT_UTC_OFFSET: &str = "-03:00";

// =============================================================================
// Output
// =============================================================================

/// Default output file for the generated facts
pub const DEFAULT_OUTPUT_FILE: &str = "doce-facts.nt";

/// Length of the hash prefix used for content-addressed identities
pub const CONTENT_HASH_LENGTH: usize = 16;
