//! Small fact builders shared by unit tests.

use crate::facts::model::*;

pub fn contract(id: &str, functions: Vec<FunctionFact>) -> ContractFact {
    ContractFact {
        id: id.into(),
        kind: ContractKind::Concrete,
        functions,
        modifiers: vec![],
    }
}

pub fn function(id: &str, visibility: Visibility) -> FunctionFact {
    FunctionFact {
        id: id.into(),
        visibility,
        is_constructor: false,
        is_fallback: false,
        is_receive: false,
        call_sites: vec![],
        state_writes: vec![],
        modifiers: vec![],
        special_var_reads: vec![],
    }
}

pub fn call(kind: CalleeKind, name: &str, position: u32) -> CallSite {
    CallSite {
        kind,
        name: name.into(),
        target: None,
        expression: None,
        statement: StatementKind::Expression,
        position,
    }
}

pub fn internal_call(contract: &str, function: &str, position: u32) -> CallSite {
    CallSite {
        target: Some(FunctionRef::new(contract, function)),
        ..call(CalleeKind::Internal, function, position)
    }
}

pub fn write(variable: &str, position: u32) -> StateWrite {
    StateWrite {
        variable: variable.into(),
        position,
    }
}
