//! Advisor relationship matching (PRD-07).
//!
//! Advisors are linked to investors and startups indirectly, through a
//! shared code: the party records the code it entered plus an acceptance
//! flag, and the advisor owns the code itself. The rule below is the single
//! definition of an effective relationship; the SQL joins in
//! `dealflow-db` mirror it and this copy keeps the rule unit-testable.

/// An advisor relationship is effective only when the party's entered code
/// matches the advisor's own code AND the advisor has accepted the party.
///
/// "Entered but not accepted" must never produce an active gate, so a
/// missing acceptance always resolves to `false` regardless of the code.
pub fn relationship_is_effective(
    code_entered: Option<&str>,
    accepted: bool,
    advisor_code: &str,
) -> bool {
    accepted && code_entered.is_some_and(|entered| entered == advisor_code)
}
