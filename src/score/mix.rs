//! Operator mix accounting for one parenthesized expression.
//!
//! Four operator families are counted while a subexpression is
//! scanned: logical ands, logical ors, assignments, and comparisons.
//! A lone family reads fine; mixing families costs, and which families
//! were mixed decides whether the charge scales with the full nesting
//! penalty or the softer demi penalty.

#[derive(Default)]
pub(super) struct OpMix {
    pub(super) and_ct: u32,
    pub(super) or_ct: u32,
    pub(super) assign_ct: u32,
    pub(super) relop_ct: u32,
}

impl OpMix {
    /// Charge for the families seen, with a one-line description for
    /// the trace log. `None` when the mix is free.
    pub(super) fn settle(&self, penalty: f64, demi: f64) -> Option<(f64, &'static str)> {
        let which = (self.and_ct > 0) as u8
            | ((self.or_ct > 0) as u8) << 1
            | ((self.assign_ct > 0) as u8) << 2
            | ((self.relop_ct > 0) as u8) << 3;

        let and = self.and_ct as f64;
        let or = self.or_ct as f64;
        let assign = self.assign_ct as f64;
        let relop = self.relop_ct as f64;

        match which {
            0x00 | 0x01 | 0x02 | 0x08 => None,
            0x04 => Some((penalty * assign, "assignment within expression")),
            0x03 => Some((penalty * (and + 1.0) * or, "AND and OR expressions")),
            0x07 => Some((
                penalty * assign + penalty * (and + 1.0) * or,
                "AND and OR expressions",
            )),
            0x05 | 0x06 => Some((
                penalty * assign + and + or,
                "assignments and boolean operators",
            )),
            0x09 | 0x0a => Some((demi * relop, "comparison and boolean operators")),
            0x0b => Some((
                demi * relop * (and + 1.0) * or,
                "AND, OR and comparison operators",
            )),
            0x0c => Some((
                penalty * assign + demi * relop,
                "assignments and comparison operators",
            )),
            0x0d | 0x0e => Some((
                penalty * (assign + relop + and + or),
                "many kinds of operators",
            )),
            _ => Some((
                penalty * (assign + relop + (and + 1.0) * or),
                "*ALL* kinds of operators",
            )),
        }
    }
}
