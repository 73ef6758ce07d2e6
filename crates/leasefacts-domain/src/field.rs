//! Field module - the eleven keys of a lease fact record

/// One key of the fixed lease fact schema
///
/// The declaration order is the canonical output order. Exactly one field,
/// `PropertyAddressAndSuite`, is derived from two others and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FactField {
    /// Tenant party name
    TenantName,

    /// Landlord party name
    LandlordName,

    /// Street address of the premises, without the suite designator
    PropertyAddress,

    /// Suite or unit designator (e.g. "4B")
    Suite,

    /// Derived from `PropertyAddress` and `Suite`
    PropertyAddressAndSuite,

    /// Total square footage, digits and decimal point only
    TotalSquareFeet,

    /// Commencement date as `DD-MM-YYYY`
    LeaseCommencementDate,

    /// Expiration date as `DD-MM-YYYY`
    LeaseExpirationDate,

    /// Tenant's proportionate share, e.g. "4.5%"
    ProportionateShare,

    /// Four-digit base year
    BaseYear,

    /// Deposit amount with cents, or the literal "None"
    SecurityDeposit,
}

impl FactField {
    /// All fields in canonical order
    pub const ALL: [FactField; 11] = [
        FactField::TenantName,
        FactField::LandlordName,
        FactField::PropertyAddress,
        FactField::Suite,
        FactField::PropertyAddressAndSuite,
        FactField::TotalSquareFeet,
        FactField::LeaseCommencementDate,
        FactField::LeaseExpirationDate,
        FactField::ProportionateShare,
        FactField::BaseYear,
        FactField::SecurityDeposit,
    ];

    /// Get the wire key for this field
    pub fn key(&self) -> &'static str {
        match self {
            FactField::TenantName => "tenant_name",
            FactField::LandlordName => "landlord_name",
            FactField::PropertyAddress => "property_address",
            FactField::Suite => "suite",
            FactField::PropertyAddressAndSuite => "property_address_and_suite",
            FactField::TotalSquareFeet => "total_square_feet",
            FactField::LeaseCommencementDate => "lease_commencement_date",
            FactField::LeaseExpirationDate => "lease_expiration_date",
            FactField::ProportionateShare => "proportionate_share",
            FactField::BaseYear => "base_year",
            FactField::SecurityDeposit => "security_deposit",
        }
    }

    /// Parse a field from its wire key (exact match)
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.key() == key)
    }

    /// Whether the value of this field is computed from other fields
    pub fn is_derived(&self) -> bool {
        matches!(self, FactField::PropertyAddressAndSuite)
    }
}

impl std::fmt::Display for FactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for FactField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown fact field: {}", s))
    }
}
