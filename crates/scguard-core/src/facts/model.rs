use serde::{Deserialize, Serialize};

/// Structural facts about one contract, as supplied by the static-analysis
/// front end. Immutable once produced; every downstream stage only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractFact {
    pub id: String,
    pub kind: ContractKind,
    /// Functions in declaration order.
    #[serde(default)]
    pub functions: Vec<FunctionFact>,
    /// Modifiers declared by (or inherited into) the contract.
    #[serde(default)]
    pub modifiers: Vec<ModifierFact>,
}

impl ContractFact {
    /// Interfaces and libraries are skipped by every analysis.
    pub fn is_concrete(&self) -> bool {
        self.kind == ContractKind::Concrete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    Concrete,
    Interface,
    Library,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierFact {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionFact {
    pub id: String,
    pub visibility: Visibility,
    #[serde(default)]
    pub is_constructor: bool,
    #[serde(default)]
    pub is_fallback: bool,
    #[serde(default)]
    pub is_receive: bool,
    /// Call sites in control-flow order.
    #[serde(default)]
    pub call_sites: Vec<CallSite>,
    /// State writes in control-flow order.
    #[serde(default)]
    pub state_writes: Vec<StateWrite>,
    /// Names of the modifiers applied to this function.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Solidity special variables read, e.g. `"tx.origin"`, `"msg.sender"`.
    #[serde(default)]
    pub special_var_reads: Vec<String>,
}

impl FunctionFact {
    /// Constructors and fallbacks are excluded from call counting and the
    /// checks-effects-interactions scan.
    pub fn skips_call_analysis(&self) -> bool {
        self.is_constructor || self.is_fallback
    }

    /// Constructors, fallbacks and receive functions are excluded from
    /// visibility counting.
    pub fn is_special(&self) -> bool {
        self.is_constructor || self.is_fallback || self.is_receive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    External,
    Private,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    pub kind: CalleeKind,
    /// Callee function name or member name (`"delegatecall"`, `"send"`, ...).
    #[serde(default)]
    pub name: String,
    /// Resolved callee, when the front end could resolve it.
    #[serde(default)]
    pub target: Option<FunctionRef>,
    /// Raw source text of the call expression.
    #[serde(default)]
    pub expression: Option<String>,
    /// Kind of statement enclosing the call.
    #[serde(default)]
    pub statement: StatementKind,
    pub position: u32,
}

impl CallSite {
    /// True for every call that leaves the contract.
    pub fn is_external(&self) -> bool {
        self.kind != CalleeKind::Internal
    }

    /// Lower-cased name and raw expression, used by substring detectors.
    pub(crate) fn lowered(&self) -> (String, Option<String>) {
        (
            self.name.to_lowercase(),
            self.expression.as_ref().map(|e| e.to_lowercase()),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalleeKind {
    Internal,
    ExternalCall,
    LowLevelCall,
    DelegateCall,
    Send,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Assignment,
    Condition,
    #[default]
    Expression,
    Return,
}

impl StatementKind {
    /// Whether the enclosing statement consumes the call's return value.
    pub fn checks_result(self) -> bool {
        matches!(self, StatementKind::Assignment | StatementKind::Condition)
    }
}

/// Qualified reference to a function of some contract.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    pub contract: String,
    pub function: String,
}

impl FunctionRef {
    pub fn new(contract: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            function: function.into(),
        }
    }

    /// Call graph node id: `Contract.function`.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.contract, self.function)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateWrite {
    pub variable: String,
    pub position: u32,
}
