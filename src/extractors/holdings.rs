// src/extractors/holdings.rs
//! Flattens a 13F information table into [`HoldingRecord`]s.
//!
//! Members are matched by position, not by tag name. The child count picks
//! one of three layouts:
//!
//! | children | layout                                                                  |
//! |----------|-------------------------------------------------------------------------|
//! | 7        | issuer, class, cusip, value, amount{2}, discretion, voting{3}          |
//! | 8        | issuer, class, cusip, value, amount{2}, discretion, manager, voting{3} |
//! | 9        | issuer, class, cusip, value, amount{2}, putCall, discretion, manager, voting{3} |

use crate::edgar::models::{HoldingRecord, NOT_APPLICABLE};
use crate::utils::error::ExtractError;
use roxmltree::{Document, Node};

/// Schema variant of an information table member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberShape {
    Basic,
    WithOtherManager,
    WithPutCallAndOtherManager,
}

impl MemberShape {
    pub fn from_child_count(count: usize) -> Option<Self> {
        match count {
            7 => Some(Self::Basic),
            8 => Some(Self::WithOtherManager),
            9 => Some(Self::WithPutCallAndOtherManager),
            _ => None,
        }
    }
}

/// Parses the information table XML. Members of unknown shape are skipped.
pub fn parse_information_table(xml: &str) -> Result<Vec<HoldingRecord>, ExtractError> {
    let document = Document::parse(xml)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (idx, member) in element_children(document.root_element()).into_iter().enumerate() {
        match parse_member(member) {
            Some(record) => {
                tracing::trace!("Member #{} kept: {}", idx, record.name_of_issuer);
                records.push(record);
            }
            None => {
                tracing::trace!("Member #{} skipped", idx);
                skipped += 1;
            }
        }
    }

    tracing::info!("Extracted {} holdings ({} members skipped)", records.len(), skipped);
    Ok(records)
}

/// Maps one member onto a record, or `None` when its layout is not recognised.
fn parse_member(member: Node) -> Option<HoldingRecord> {
    let fields = element_children(member);
    let Some(shape) = MemberShape::from_child_count(fields.len()) else {
        tracing::debug!("Skipping <{}> with {} children", member.tag_name().name(), fields.len());
        return None;
    };

    let (put_call, discretion, other_manager, voting) = match shape {
        MemberShape::Basic => (None, fields[5], None, fields[6]),
        MemberShape::WithOtherManager => (None, fields[5], Some(fields[6]), fields[7]),
        MemberShape::WithPutCallAndOtherManager => {
            (Some(fields[5]), fields[6], Some(fields[7]), fields[8])
        }
    };

    let amount = element_children(fields[4]);
    let votes = element_children(voting);
    if amount.len() < 2 || votes.len() < 3 {
        tracing::warn!(
            "Skipping member '{}': expected 2 amount and 3 voting fields, found {} and {}",
            text_of(fields[0]),
            amount.len(),
            votes.len()
        );
        return None;
    }

    Some(HoldingRecord {
        name_of_issuer: text_of(fields[0]),
        title_of_class: text_of(fields[1]),
        cusip: text_of(fields[2]),
        value: text_of(fields[3]),
        ssh_prnamt: text_of(amount[0]),
        ssh_prnamt_type: text_of(amount[1]),
        put_call: put_call.map_or_else(|| NOT_APPLICABLE.to_string(), text_of),
        investment_discretion: text_of(discretion),
        other_manager: other_manager.map_or_else(|| NOT_APPLICABLE.to_string(), text_of),
        voting_sole: text_of(votes[0]),
        voting_shared: text_of(votes[1]),
        voting_none: text_of(votes[2]),
    })
}

fn element_children<'a, 'input>(node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    node.children().filter(|n| n.is_element()).collect()
}

fn text_of(node: Node) -> String {
    node.text().map(str::trim).unwrap_or_default().to_string()
}
