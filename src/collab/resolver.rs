//! Collaboration resolver: from a node's collaboration mode to the concrete
//! set of actors and their zone-scoped field permissions.
//!
//! Resolution degrades gracefully: dangling references (deleted employee,
//! deleted zone, empty actor property) drop the affected entry and report a
//! warning instead of failing the whole resolution.

use std::collections::BTreeSet;

use crate::document::FieldSnapshot;
use crate::error::{ConfigWarning, WarningCode};
use crate::graph::{ActorSource, Collaboration, EmployeeId, Node, PositionRule, ZoneRefs};
use crate::zone::{ZoneCatalog, ZoneScope};

use super::directory::Directory;

/// One resolved actor with their field permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorAssignment {
    pub employee: EmployeeId,
    pub visible: BTreeSet<String>,
    pub editable: BTreeSet<String>,
}

/// Resolution outcome: assignments plus non-fatal warnings ("partial
/// resolution").
#[derive(Debug, Default)]
pub struct Resolution {
    pub assignments: Vec<ActorAssignment>,
    pub warnings: Vec<ConfigWarning>,
}

impl Resolution {
    pub fn is_partial(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Everything actor resolution may consult, passed explicitly.
pub struct ResolveContext<'a> {
    pub snapshot: &'a FieldSnapshot,
    pub creator: &'a str,
    /// Employee who acted on the immediately preceding stage, if any.
    pub previous_actor: Option<&'a str>,
    pub zones: &'a ZoneCatalog,
    pub directory: &'a dyn Directory,
    /// When false, zone scoping is disabled for the workflow and every
    /// actor receives the unrestricted scope.
    pub zone_scoped: bool,
}

impl<'a> ResolveContext<'a> {
    fn scope_for(&self, refs: &ZoneRefs, warnings: &mut Vec<ConfigWarning>) -> ZoneScope {
        if !self.zone_scoped {
            return ZoneScope::unrestricted(self.zones);
        }
        let (scope, zone_warnings) = self.zones.resolve_scope(&refs.zone, &refs.zone_hidden);
        warnings.extend(zone_warnings);
        scope
    }
}

/// Resolve the actors for one node.
///
/// System nodes (the initial entry point) have no actors; the result is
/// empty with no warnings.
pub fn resolve_actors(node: &Node, ctx: &ResolveContext<'_>) -> Resolution {
    let collaboration = match node.collaboration() {
        Some(c) => c,
        None => return Resolution::default(),
    };

    let mut resolution = Resolution::default();
    match collaboration {
        Collaboration::InForm { property, scope } => {
            resolve_in_form(node, property, scope, ctx, &mut resolution);
        }
        Collaboration::OutForm {
            employees,
            scope,
            edit_all,
        } => {
            resolve_out_form(node, employees, scope, *edit_all, ctx, &mut resolution);
        }
        Collaboration::InWorkflow { entries } => {
            for entry in entries {
                let employees = resolve_source(&entry.source, ctx, &mut resolution.warnings);
                push_assignments(&employees, &entry.scope, false, ctx, &mut resolution);
            }
        }
    }

    for warning in &resolution.warnings {
        tracing::warn!(node = %node.id, warning = %warning, "partial actor resolution");
    }
    resolution
}

fn resolve_in_form(
    node: &Node,
    property: &str,
    scope: &ZoneRefs,
    ctx: &ResolveContext<'_>,
    resolution: &mut Resolution,
) {
    let employee = ctx
        .snapshot
        .get(property)
        .and_then(|v| v.as_text())
        .filter(|s| !s.is_empty());
    match employee {
        Some(employee) => {
            push_assignments(&[employee.to_string()], scope, false, ctx, resolution);
        }
        // No default approver: fail closed with an empty assignment list.
        None => resolution.warnings.push(ConfigWarning::new(
            WarningCode::EmptyActorProperty,
            format!(
                "node '{}': document property '{property}' holds no employee reference",
                node.id
            ),
        )),
    }
}

fn resolve_out_form(
    _node: &Node,
    employees: &[EmployeeId],
    scope: &ZoneRefs,
    edit_all: bool,
    ctx: &ResolveContext<'_>,
    resolution: &mut Resolution,
) {
    push_assignments(employees, scope, edit_all, ctx, resolution);
}

fn resolve_source(
    source: &ActorSource,
    ctx: &ResolveContext<'_>,
    warnings: &mut Vec<ConfigWarning>,
) -> Vec<EmployeeId> {
    match source {
        ActorSource::Employee(employee) => vec![employee.clone()],
        ActorSource::PreviousActor => match ctx.previous_actor {
            Some(actor) => vec![actor.to_string()],
            None => {
                warnings.push(ConfigWarning::new(
                    WarningCode::EmptyActorProperty,
                    "previous-actor source used but no stage has been acted on yet".to_string(),
                ));
                Vec::new()
            }
        },
        ActorSource::Position(PositionRule::DirectManagerOfCreator) => {
            match ctx.directory.manager_of(ctx.creator) {
                Some(manager) => vec![manager],
                None => {
                    warnings.push(ConfigWarning::new(
                        WarningCode::UnknownEmployee,
                        format!("creator '{}' has no manager in the directory", ctx.creator),
                    ));
                    Vec::new()
                }
            }
        }
        ActorSource::Position(PositionRule::Holder(position)) => {
            let holders = ctx.directory.holders_of(position);
            if holders.is_empty() {
                warnings.push(ConfigWarning::new(
                    WarningCode::UnknownEmployee,
                    format!("no employee holds position '{position}'"),
                ));
            }
            holders
        }
    }
}

fn push_assignments(
    employees: &[EmployeeId],
    refs: &ZoneRefs,
    edit_all: bool,
    ctx: &ResolveContext<'_>,
    resolution: &mut Resolution,
) {
    let scope = if edit_all {
        ZoneScope::unrestricted(ctx.zones)
    } else {
        ctx.scope_for(refs, &mut resolution.warnings)
    };

    for employee in employees {
        if !ctx.directory.employee_exists(employee) {
            resolution.warnings.push(ConfigWarning::new(
                WarningCode::UnknownEmployee,
                format!("employee '{employee}' not found in the directory; entry skipped"),
            ));
            continue;
        }
        resolution.assignments.push(ActorAssignment {
            employee: employee.clone(),
            visible: scope.visible.clone(),
            editable: scope.editable.clone(),
        });
    }
}
