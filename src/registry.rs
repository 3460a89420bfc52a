//! Operator metadata
//!
//! Static description of the select operator: operand names, the dtype sets
//! each operand accepts, and the device classes the schedule was written for.
//! The host API consults this to validate inputs before planning; there is no
//! dynamic registration machinery.

use crate::dtype::DTypeSet;

/// One operand of the operator definition
#[derive(Copy, Clone, Debug)]
pub struct ParamDef {
    /// Operand name
    pub name: &'static str,
    /// Element types this operand accepts
    pub accepted: DTypeSet,
}

/// Static operator definition
#[derive(Clone, Debug)]
pub struct OpDef {
    /// Operator name
    pub name: &'static str,
    /// Input operands, in call order
    pub inputs: &'static [ParamDef],
    /// Output operands
    pub outputs: &'static [ParamDef],
    /// Device classes the tiling schedule targets
    pub device_configs: &'static [&'static str],
}

/// The select operator definition: `y = condition ? x1 : x2`
pub const SELECT_V2: OpDef = OpDef {
    name: "SelectV2",
    inputs: &[
        ParamDef {
            name: "condition",
            accepted: DTypeSet::CONDITION,
        },
        ParamDef {
            name: "x1",
            accepted: DTypeSet::VALUES,
        },
        ParamDef {
            name: "x2",
            accepted: DTypeSet::VALUES,
        },
    ],
    outputs: &[ParamDef {
        name: "y",
        accepted: DTypeSet::VALUES,
    }],
    device_configs: &["ascend910", "ascend310p", "ascend310b", "ascend910b"],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    #[test]
    fn test_select_v2_def() {
        assert_eq!(SELECT_V2.inputs.len(), 3);
        assert_eq!(SELECT_V2.outputs.len(), 1);
        assert!(SELECT_V2.inputs[0].accepted.contains(DType::Bool));
        assert!(SELECT_V2.inputs[1].accepted.contains(DType::F32));
        assert!(!SELECT_V2.inputs[1].accepted.contains(DType::Bool));
    }
}
