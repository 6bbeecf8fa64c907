use std::fmt;

use kubeinspect_types::{InspectError, Result};

/// CPU suffixes and the divisor that turns the numeric part into cores
const CPU_SUFFIXES: &[(&str, f64)] = &[("n", 1e9), ("u", 1e6), ("m", 1e3)];

/// Memory suffixes and the multiplier that turns the numeric part into Mi
const MEMORY_SUFFIXES: &[(&str, f64)] = &[
    ("Ki", 1.0 / 1024.0),
    ("Mi", 1.0),
    ("Gi", 1024.0),
    ("Ti", 1024.0 * 1024.0),
    ("Pi", 1024.0 * 1024.0 * 1024.0),
    ("Ei", 1024.0 * 1024.0 * 1024.0 * 1024.0),
];

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// What a quantity measures
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityKind {
    Cpu,
    Memory,
}

/// A CPU or memory quantity as reported by the cluster, split into its numeric
/// part and unit suffix.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceQuantity {
    kind: QuantityKind,
    value: f64,
    suffix: &'static str,
    normalized: f64,
}

impl ResourceQuantity {
    /// Parse a CPU quantity (`"250m"`, `"1500000n"`, `"2"`)
    pub fn cpu(quantity: &str) -> Result<Self> {
        Self::parse(QuantityKind::Cpu, quantity)
    }

    /// Parse a memory quantity (`"512Mi"`, `"2Gi"`, `"1048576"`)
    pub fn memory(quantity: &str) -> Result<Self> {
        Self::parse(QuantityKind::Memory, quantity)
    }

    pub fn parse(kind: QuantityKind, quantity: &str) -> Result<Self> {
        let trimmed = quantity.trim();
        let table = match kind {
            QuantityKind::Cpu => CPU_SUFFIXES,
            QuantityKind::Memory => MEMORY_SUFFIXES,
        };

        // Unknown suffixes stay part of the number and fail to parse below
        let (number, suffix, scale) = table
            .iter()
            .find_map(|(suffix, scale)| {
                trimmed
                    .strip_suffix(suffix)
                    .map(|number| (number, *suffix, Some(*scale)))
            })
            .unwrap_or((trimmed, "", None));

        let value = parse_number(quantity, number)?;

        let normalized = match (kind, scale) {
            (QuantityKind::Cpu, Some(divisor)) => value / divisor,
            (QuantityKind::Cpu, None) => value,
            (QuantityKind::Memory, Some(factor)) => value * factor,
            (QuantityKind::Memory, None) => value / BYTES_PER_MEGABYTE,
        };

        Ok(Self {
            kind,
            value,
            suffix,
            normalized,
        })
    }

    pub fn kind(&self) -> QuantityKind {
        self.kind
    }

    /// Numeric part as written
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Matched unit suffix, empty for a bare number
    pub fn suffix(&self) -> &'static str {
        self.suffix
    }

    /// Cores for CPU, fractional megabytes (Mi) for memory
    pub fn normalized(&self) -> f64 {
        self.normalized
    }
}

impl fmt::Display for ResourceQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.suffix)
    }
}

fn parse_number(quantity: &str, number: &str) -> Result<f64> {
    if number.is_empty() {
        return Err(InspectError::quantity(quantity, "missing numeric value"));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| InspectError::quantity(quantity, format!("'{}' is not a number", number)))?;

    if !value.is_finite() {
        return Err(InspectError::quantity(quantity, "value is not finite"));
    }
    // Catches "-0" too, which compares equal to zero
    if value.is_sign_negative() {
        return Err(InspectError::quantity(quantity, "value is negative"));
    }

    Ok(value)
}

/// Convert a CPU quantity to cores
pub fn cpu_to_cores(quantity: &str) -> Result<f64> {
    Ok(ResourceQuantity::cpu(quantity)?.normalized())
}

/// Convert a memory quantity to whole megabytes (Mi), truncating any fraction
pub fn memory_to_megabytes(quantity: &str) -> Result<u64> {
    let megabytes = ResourceQuantity::memory(quantity)?.normalized().trunc();

    // `as` would saturate; 2^64 is the first value u64 cannot hold
    if megabytes >= u64::MAX as f64 {
        return Err(InspectError::quantity(quantity, "value does not fit in 64 bits"));
    }

    Ok(megabytes as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_suffixes() {
        assert_eq!(cpu_to_cores("500m").unwrap(), 0.5);
        assert_eq!(cpu_to_cores("250000n").unwrap(), 0.00025);
        assert_eq!(cpu_to_cores("1500u").unwrap(), 0.0015);
        assert_eq!(cpu_to_cores("2").unwrap(), 2.0);
        assert_eq!(cpu_to_cores("0.25").unwrap(), 0.25);
    }

    #[test]
    fn test_memory_suffixes() {
        assert_eq!(memory_to_megabytes("1024Ki").unwrap(), 1);
        assert_eq!(memory_to_megabytes("128Mi").unwrap(), 128);
        assert_eq!(memory_to_megabytes("1Gi").unwrap(), 1024);
        assert_eq!(memory_to_megabytes("1Ti").unwrap(), 1024 * 1024);
        assert_eq!(memory_to_megabytes("1Pi").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(memory_to_megabytes("1Ei").unwrap(), 1024 * 1024 * 1024 * 1024);
    }

    #[test]
    fn test_memory_raw_bytes() {
        assert_eq!(memory_to_megabytes("134217728").unwrap(), 128);
        // Less than a megabyte truncates to zero
        assert_eq!(memory_to_megabytes("1000").unwrap(), 0);
    }

    #[test]
    fn test_memory_fraction_truncates() {
        assert_eq!(memory_to_megabytes("1536Ki").unwrap(), 1);
        assert_eq!(memory_to_megabytes("1.5Gi").unwrap(), 1536);
    }

    #[test]
    fn test_suffix_must_match_exactly() {
        // "M" alone is not in the table, so the whole string must be a number
        assert!(memory_to_megabytes("128M").is_err());
        // A CPU-style suffix is not a memory unit
        assert!(memory_to_megabytes("128m").is_err());
        assert!(cpu_to_cores("1Gi").is_err());
    }

    #[test]
    fn test_malformed_quantities() {
        for bad in ["", "m", "abc", "12xm", "-5m", "-0", "-0m", "inf", "NaN"] {
            assert!(
                matches!(cpu_to_cores(bad), Err(InspectError::MalformedQuantity { .. })),
                "expected cpu {bad:?} to be rejected"
            );
        }
        for bad in ["", "Mi", "abc", "12xMi", "-1Gi", "-0Mi", "infKi"] {
            assert!(
                matches!(memory_to_megabytes(bad), Err(InspectError::MalformedQuantity { .. })),
                "expected memory {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_zero_is_positive() {
        let cores = cpu_to_cores("0").unwrap();
        assert_eq!(cores, 0.0);
        assert!(cores.is_sign_positive());
        assert_eq!(memory_to_megabytes("0Mi").unwrap(), 0);
    }

    #[test]
    fn test_memory_out_of_range() {
        // 2^23 Ei is 2^63 Mi and still fits
        assert_eq!(memory_to_megabytes("8388608Ei").unwrap(), 1 << 63);
        assert!(matches!(
            memory_to_megabytes("100000000Ei"),
            Err(InspectError::MalformedQuantity { .. })
        ));
        assert!(memory_to_megabytes("16777216Ei").is_err());
    }

    #[test]
    fn test_quantity_parts() {
        let q = ResourceQuantity::memory("512Mi").unwrap();
        assert_eq!(q.kind(), QuantityKind::Memory);
        assert_eq!(q.value(), 512.0);
        assert_eq!(q.suffix(), "Mi");
        assert_eq!(q.to_string(), "512Mi");

        let q = ResourceQuantity::cpu("3").unwrap();
        assert_eq!(q.suffix(), "");
        assert_eq!(q.normalized(), 3.0);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let first = cpu_to_cores("333m").unwrap();
        let second = cpu_to_cores("333m").unwrap();
        assert_eq!(first, second);
    }
}
