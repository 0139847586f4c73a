//! Injector system - toggling and applying injectors to targets

use hecs::{Entity, World};

use crate::components::{Injector, Liver, Position, SolutionContainer};
use crate::notify::Notifications;
use reagent_logic::{InjectorMode, InjectorNotice, SolutionCaps};

/// A user activated the injector in hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseEvent {
    pub user: Entity,
    pub tool: Entity,
}

/// A user applied the injector to something (or to nothing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEvent {
    pub user: Entity,
    pub tool: Entity,
    pub target: Option<Entity>,
}

fn tool_position(world: &World, tool: Entity) -> Position {
    world
        .get::<&Position>(tool)
        .map(|pos| *pos)
        .unwrap_or_default()
}

/// Toggle the injector's mode and tell the user which mode it is in.
///
/// Returns false only when `tool` isn't an injector.
pub fn use_injector(world: &World, event: UseEvent, notices: &mut Notifications) -> bool {
    let Ok(mut injector) = world.get::<&mut Injector>(event.tool) else {
        return false;
    };

    if injector.toggle() {
        log::debug!("Injector {:?} switched to {}", event.tool, injector.mode());
    }

    let notice = InjectorNotice::ModeChanged(injector.mode());
    notices.popup(tool_position(world, event.tool), event.user, notice.to_string());
    true
}

/// Apply an injector to a target.
///
/// Targets with an injectable `SolutionContainer` can be injected into or
/// drawn from; targets with a `Liver` can only be injected into. Anything
/// else is ignored. Returns the notice shown to the user, if any.
pub fn apply_injector(
    world: &World,
    event: InteractionEvent,
    notices: &mut Notifications,
) -> Option<InjectorNotice> {
    let target = event.target?;
    let mut injector = world.get::<&mut Injector>(event.tool).ok()?;

    if !injector.internal().caps.contains(SolutionCaps::INJECTOR) {
        return None;
    }

    let container = world
        .get::<&mut SolutionContainer>(target)
        .ok()
        .filter(|c| c.accepts_injection());

    let notice = if let Some(mut container) = container {
        match injector.mode() {
            InjectorMode::Inject => injector.inject_into(&mut container.solution),
            InjectorMode::Draw => injector.draw_from(&mut container.solution),
        }
    } else {
        let mut liver = world.get::<&mut Liver>(target).ok()?;
        if injector.mode() != InjectorMode::Inject {
            return None;
        }
        injector.inject_into(liver.internal_mut())
    };

    log::debug!(
        "Injector {:?} applied to {:?}: {} ({}/{})",
        event.tool,
        target,
        notice,
        injector.internal().current_volume(),
        injector.internal().max_volume()
    );

    notices.popup(tool_position(world, event.tool), event.user, notice.to_string());
    Some(notice)
}
