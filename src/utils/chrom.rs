use regex::Regex;
use std::sync::OnceLock;

fn plain_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,2}$").unwrap())
}

/// Normalizes a chromosome label to the two-digit convention used across
/// the bin and segment indices: "23" and "24" become the sex chromosomes,
/// short numerics are zero-padded so lexicographic order matches genomic
/// order, and any other label is uppercased.
pub fn format_chrom_number(chrom_number: &str) -> String {
    let trimmed = chrom_number.trim();

    match trimmed {
        "23" => return "X".to_string(),
        "24" => return "Y".to_string(),
        _ => {}
    }

    if plain_number().is_match(trimmed) {
        return format!("{:0>2}", trimmed);
    }

    trimmed.to_uppercase()
}
