//! GSAS-II crystallography formats.
//!
//! Project (`gpx`) and raw powder (`raw`) files have no reliable signature and
//! must be assigned by hand.

use crate::descriptor::{Access, FormatDescriptor, TextEncoding};

/// Header of a GSAS `.prm` file: 12 spaces followed by a column ruler.
pub const PRM_HEADER: &str = "            1234567890";

/// Marker line written at the top of `.instprm` files.
pub const INSTPRM_MARKER: &str = "GSAS-II instrument parameter file";

/// Both phrases appear in the title block of `.gsa` powder data.
pub const GSA_MARKERS: [&str; 2] = ["Sample Run:", "Wavelength:"];

const TEXT: Access = Access::Text(TextEncoding::Utf8);

/// Pickled project file, read as Latin-1 when opened.
pub fn project() -> FormatDescriptor {
    FormatDescriptor::sniffing_disabled(
        "gpx",
        "GSAS-II project file",
        Access::Text(TextEncoding::Latin1),
        64,
    )
}

pub fn instrument_parameter() -> FormatDescriptor {
    FormatDescriptor::new(
        "instprm",
        "GSAS-II instrument parameter file",
        TEXT,
        50,
        |prefix| prefix.contains(INSTPRM_MARKER),
    )
}

pub fn powder_data() -> FormatDescriptor {
    FormatDescriptor::new(
        "gsa",
        "GSAS-II powder diffraction data",
        TEXT,
        70,
        |prefix| GSA_MARKERS.iter().all(|marker| prefix.contains(marker)),
    )
}

pub fn legacy_instrument_parameter() -> FormatDescriptor {
    FormatDescriptor::new(
        "prm",
        "GSAS instrument parameter file",
        TEXT,
        PRM_HEADER.len(),
        |prefix| prefix.as_text() == Some(PRM_HEADER),
    )
}

pub fn raw_powder_data() -> FormatDescriptor {
    FormatDescriptor::sniffing_disabled("raw", "GSAS-II raw powder diffraction data", TEXT, 64)
}

/// All GSAS-II descriptors, most specific signature first.
pub fn descriptors() -> Vec<FormatDescriptor> {
    vec![
        project(),
        instrument_parameter(),
        powder_data(),
        legacy_instrument_parameter(),
        raw_powder_data(),
    ]
}
