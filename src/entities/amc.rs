// 🏦 AMC Entity - Asset Management Companies registered with AMFI
//
// Every AMC has:
// - A numeric id (the AMFI `mfId`) that NEVER changes
// - A code (upper snake case) used for exact lookups
// - A display name
//
// The table is fixed at compile time. It is refreshed by hand when AMFI adds
// or removes AMCs (see `crate::sync`).

use anyhow::Result;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmcError {
    #[error("unknown AMC id: {0}")]
    UnknownId(u32),

    #[error("unknown AMC code: {0:?}")]
    UnknownCode(String),

    #[error("duplicate AMC id {id} ({first} and {second})")]
    DuplicateId {
        id: u32,
        first: &'static str,
        second: &'static str,
    },

    #[error("duplicate AMC code: {0}")]
    DuplicateCode(&'static str),
}

// ============================================================================
// AMC TABLE
// ============================================================================

macro_rules! amc_table {
    ($( $variant:ident = $id:literal, $code:literal, $name:literal; )+) => {
        /// Asset Management Company, keyed by its AMFI id
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum Amc {
            $( $variant = $id, )+
        }

        impl Amc {
            /// Every AMC, in declaration order
            pub const ALL: &'static [Amc] = &[ $( Amc::$variant, )+ ];

            /// Upper snake case code, e.g. `HDFC_MUTUAL_FUND`
            pub fn code(self) -> &'static str {
                match self {
                    $( Amc::$variant => $code, )+
                }
            }

            /// Human-readable name for display
            pub fn name(self) -> &'static str {
                match self {
                    $( Amc::$variant => $name, )+
                }
            }

            /// Exact lookup by AMFI id
            pub fn from_id(id: u32) -> Option<Amc> {
                match id {
                    $( $id => Some(Amc::$variant), )+
                    _ => None,
                }
            }

            /// Exact lookup by code (case-sensitive, no partial matches)
            pub fn from_code(code: &str) -> Option<Amc> {
                match code {
                    $( $code => Some(Amc::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

amc_table! {
    AllianceCapitalMutualFund = 1, "ALLIANCE_CAPITAL_MUTUAL_FUND", "Alliance Capital Mutual Fund";
    StandardCharteredMutualFund = 2, "STANDARD_CHARTERED_MUTUAL_FUND", "Standard Chartered Mutual Fund";
    AdityaBirlaSunLifeMutualFund = 3, "ADITYA_BIRLA_SUN_LIFE_MUTUAL_FUND", "Aditya Birla Sun Life Mutual Fund";
    BarodaBnpParibasMutualFund = 4, "BARODA_BNP_PARIBAS_MUTUAL_FUND", "Baroda BNP Paribas Mutual Fund";
    DspMutualFund = 6, "DSP_MUTUAL_FUND", "DSP Mutual Fund";
    GicMutualFund = 8, "GIC_MUTUAL_FUND", "GIC Mutual Fund";
    HdfcMutualFund = 9, "HDFC_MUTUAL_FUND", "HDFC Mutual Fund";
    IlAndFsMutualFund = 11, "IL_FS_MUTUAL_FUND", "IL&FS Mutual Fund";
    IngMutualFund = 14, "ING_MUTUAL_FUND", "ING Mutual Fund";
    JmFinancialMutualFund = 16, "JM_FINANCIAL_MUTUAL_FUND", "JM Financial Mutual Fund";
    KotakMahindraMutualFund = 17, "KOTAK_MAHINDRA_MUTUAL_FUND", "Kotak Mahindra Mutual Fund";
    LicMutualFund = 18, "LIC_MUTUAL_FUND", "LIC Mutual Fund";
    MorganStanleyMutualFund = 19, "MORGAN_STANLEY_MUTUAL_FUND", "Morgan Stanley Mutual Fund";
    IciciPrudentialMutualFund = 20, "ICICI_PRUDENTIAL_MUTUAL_FUND", "ICICI Prudential Mutual Fund";
    NipponIndiaMutualFund = 21, "NIPPON_INDIA_MUTUAL_FUND", "Nippon India Mutual Fund";
    SbiMutualFund = 22, "SBI_MUTUAL_FUND", "SBI Mutual Fund";
    SunFAndCMutualFund = 24, "SUN_F_C_MUTUAL_FUND", "Sun F&C Mutual Fund";
    TataMutualFund = 25, "TATA_MUTUAL_FUND", "Tata Mutual Fund";
    TaurusMutualFund = 26, "TAURUS_MUTUAL_FUND", "Taurus Mutual Fund";
    FranklinTempletonMutualFund = 27, "FRANKLIN_TEMPLETON_MUTUAL_FUND", "Franklin Templeton Mutual Fund";
    UtiMutualFund = 28, "UTI_MUTUAL_FUND", "UTI Mutual Fund";
    QuantMutualFund = 30, "QUANT_MUTUAL_FUND", "quant Mutual Fund";
    DbsCholaMutualFund = 31, "DBS_CHOLA_MUTUAL_FUND", "DBS Chola Mutual Fund";
    CanaraRobecoMutualFund = 32, "CANARA_ROBECO_MUTUAL_FUND", "Canara Robeco Mutual Fund";
    SundaramMutualFund = 33, "SUNDARAM_MUTUAL_FUND", "Sundaram Mutual Fund";
    PrincipalMutualFund = 34, "PRINCIPAL_MUTUAL_FUND", "Principal Mutual Fund";
    SaharaMutualFund = 35, "SAHARA_MUTUAL_FUND", "Sahara Mutual Fund";
    BenchmarkMutualFund = 36, "BENCHMARK_MUTUAL_FUND", "Benchmark Mutual Fund";
    HsbcMutualFund = 37, "HSBC_MUTUAL_FUND", "HSBC Mutual Fund";
    DeutscheMutualFund = 38, "DEUTSCHE_MUTUAL_FUND", "Deutsche Mutual Fund";
    AbnAmroMutualFund = 39, "ABN_AMRO_MUTUAL_FUND", "ABN AMRO Mutual Fund";
    FidelityMutualFund = 40, "FIDELITY_MUTUAL_FUND", "Fidelity Mutual Fund";
    QuantumMutualFund = 41, "QUANTUM_MUTUAL_FUND", "Quantum Mutual Fund";
    InvescoMutualFund = 42, "INVESCO_MUTUAL_FUND", "Invesco Mutual Fund";
    JpMorganMutualFund = 43, "JPMORGAN_MUTUAL_FUND", "JPMorgan Mutual Fund";
    PpfasMutualFund = 44, "PPFAS_MUTUAL_FUND", "PPFAS Mutual Fund";
    MiraeAssetMutualFund = 45, "MIRAE_ASSET_MUTUAL_FUND", "Mirae Asset Mutual Fund";
    BankOfIndiaMutualFund = 46, "BANK_OF_INDIA_MUTUAL_FUND", "Bank of India Mutual Fund";
    EdelweissMutualFund = 47, "EDELWEISS_MUTUAL_FUND", "Edelweiss Mutual Fund";
    BandhanMutualFund = 48, "BANDHAN_MUTUAL_FUND", "Bandhan Mutual Fund";
    GoldmanSachsMutualFund = 49, "GOLDMAN_SACHS_MUTUAL_FUND", "Goldman Sachs Mutual Fund";
    AegonMutualFund = 50, "AEGON_MUTUAL_FUND", "AEGON Mutual Fund";
    FortisMutualFund = 51, "FORTIS_MUTUAL_FUND", "Fortis Mutual Fund";
    ShinseiMutualFund = 52, "SHINSEI_MUTUAL_FUND", "Shinsei Mutual Fund";
    AxisMutualFund = 53, "AXIS_MUTUAL_FUND", "Axis Mutual Fund";
    PeerlessMutualFund = 54, "PEERLESS_MUTUAL_FUND", "Peerless Mutual Fund";
    MotilalOswalMutualFund = 55, "MOTILAL_OSWAL_MUTUAL_FUND", "Motilal Oswal Mutual Fund";
    LAndTMutualFund = 56, "L_T_MUTUAL_FUND", "L&T Mutual Fund";
    IdbiMutualFund = 57, "IDBI_MUTUAL_FUND", "IDBI Mutual Fund";
    PgimIndiaMutualFund = 58, "PGIM_INDIA_MUTUAL_FUND", "PGIM India Mutual Fund";
    BnpParibasMutualFund = 59, "BNP_PARIBAS_MUTUAL_FUND", "BNP Paribas Mutual Fund";
    DaiwaMutualFund = 60, "DAIWA_MUTUAL_FUND", "Daiwa Mutual Fund";
    UnionMutualFund = 61, "UNION_MUTUAL_FUND", "Union Mutual Fund";
    ThreeSixtyOneMutualFund = 62, "_360_ONE_MUTUAL_FUND", "360 ONE Mutual Fund";
    NaviMutualFund = 63, "NAVI_MUTUAL_FUND", "Navi Mutual Fund";
    IlAndFsInfraDebtFund = 65, "IL_FS_INFRA_DEBT_FUND", "IL&FS Infra Debt Fund";
    GrowwMutualFund = 66, "GROWW_MUTUAL_FUND", "Groww Mutual Fund";
    ShriramMutualFund = 67, "SHRIRAM_MUTUAL_FUND", "Shriram Mutual Fund";
    MahindraManulifeMutualFund = 69, "MAHINDRA_MANULIFE_MUTUAL_FUND", "Mahindra Manulife Mutual Fund";
    ItiMutualFund = 70, "ITI_MUTUAL_FUND", "ITI Mutual Fund";
    TrustMutualFund = 71, "TRUST_MUTUAL_FUND", "TRUST Mutual Fund";
    NjMutualFund = 72, "NJ_MUTUAL_FUND", "NJ Mutual Fund";
    SamcoMutualFund = 73, "SAMCO_MUTUAL_FUND", "Samco Mutual Fund";
    BajajFinservMutualFund = 74, "BAJAJ_FINSERV_MUTUAL_FUND", "Bajaj Finserv Mutual Fund";
    HeliosMutualFund = 75, "HELIOS_MUTUAL_FUND", "Helios Mutual Fund";
    ZerodhaMutualFund = 76, "ZERODHA_MUTUAL_FUND", "Zerodha Mutual Fund";
    OldBridgeMutualFund = 77, "OLD_BRIDGE_MUTUAL_FUND", "Old Bridge Mutual Fund";
    UnifiMutualFund = 78, "UNIFI_MUTUAL_FUND", "Unifi Mutual Fund";
    AngelOneMutualFund = 79, "ANGEL_ONE_MUTUAL_FUND", "Angel One Mutual Fund";
    JioBlackRockMutualFund = 80, "JIO_BLACKROCK_MUTUAL_FUND", "Jio BlackRock Mutual Fund";
}

impl Amc {
    /// AMFI id (`mfId`)
    pub fn id(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Amc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Amc {
    type Err = AmcError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Amc::from_code(code).ok_or_else(|| AmcError::UnknownCode(code.to_string()))
    }
}

impl TryFrom<u32> for Amc {
    type Error = AmcError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        Amc::from_id(id).ok_or(AmcError::UnknownId(id))
    }
}

// Serialized by code so stored values survive renames of the display name
impl Serialize for Amc {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Amc {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(de::Error::custom)
    }
}

// ============================================================================
// AMC REGISTRY
// ============================================================================

/// Index over the AMC table
///
/// Built once at startup. Construction verifies that ids and codes are unique,
/// so every lookup afterwards resolves to at most one AMC.
#[derive(Debug, Clone)]
pub struct AmcRegistry {
    entries: Vec<Amc>,
    by_id: HashMap<u32, Amc>,
    by_code: HashMap<&'static str, Amc>,
}

/// One CSV row of the exported table
#[derive(Debug, Serialize)]
struct AmcRow {
    id: u32,
    code: &'static str,
    name: &'static str,
}

impl AmcRegistry {
    /// Create registry over the full AMC table
    pub fn new() -> Result<Self, AmcError> {
        Self::from_entries(Amc::ALL)
    }

    /// Create registry over a caller-supplied slice of AMCs
    ///
    /// `#[repr(u32)]` already keeps variant ids distinct, so a duplicate id here
    /// means the slice lists an AMC twice. Code literals are not checked by the
    /// compiler, so two variants sharing a code is caught as `DuplicateCode`.
    pub fn from_entries(entries: &[Amc]) -> Result<Self, AmcError> {
        let rows: Vec<(u32, &'static str)> =
            entries.iter().map(|amc| (amc.id(), amc.code())).collect();
        verify_unique(&rows)?;

        let by_id = entries.iter().map(|&amc| (amc.id(), amc)).collect();
        let by_code = entries.iter().map(|&amc| (amc.code(), amc)).collect();

        let mut entries = entries.to_vec();
        entries.sort_by_key(|amc| amc.id());

        Ok(AmcRegistry {
            entries,
            by_id,
            by_code,
        })
    }

    pub fn by_id(&self, id: u32) -> Result<Amc, AmcError> {
        self.by_id.get(&id).copied().ok_or(AmcError::UnknownId(id))
    }

    pub fn by_code(&self, code: &str) -> Result<Amc, AmcError> {
        self.by_code
            .get(code)
            .copied()
            .ok_or_else(|| AmcError::UnknownCode(code.to_string()))
    }

    /// Resolve either a code (`AXIS_MUTUAL_FUND`) or a decimal id (`53`)
    pub fn resolve(&self, key: &str) -> Result<Amc, AmcError> {
        if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = key.parse::<u32>() {
                return self.by_id(id);
            }
        }
        self.by_code(key)
    }

    /// All AMCs, ordered by id
    pub fn all(&self) -> &[Amc] {
        &self.entries
    }

    pub fn ids(&self) -> BTreeSet<u32> {
        self.by_id.keys().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Write the table as CSV (`id,code,name`), ordered by id
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for amc in &self.entries {
            csv_writer.serialize(AmcRow {
                id: amc.id(),
                code: amc.code(),
                name: amc.name(),
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Reject a table whose `(id, code)` rows repeat an id or a code
fn verify_unique(rows: &[(u32, &'static str)]) -> Result<(), AmcError> {
    let mut seen_ids: HashMap<u32, &'static str> = HashMap::with_capacity(rows.len());
    let mut seen_codes = BTreeSet::new();

    for &(id, code) in rows {
        if let Some(first) = seen_ids.insert(id, code) {
            return Err(AmcError::DuplicateId {
                id,
                first,
                second: code,
            });
        }
        if !seen_codes.insert(code) {
            return Err(AmcError::DuplicateCode(code));
        }
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
