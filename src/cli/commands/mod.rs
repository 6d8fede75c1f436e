pub mod backup;
pub mod field;
pub mod fill;
pub mod form;
pub mod preview;
pub mod rule;
pub mod step;
pub mod system;
pub mod template;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_group("Forms", form::definitions());
    registry.register_group("Fields", field::definitions());
    registry.register_group("Rules", rule::definitions());
    registry.register_group("Steps", step::definitions());
    registry.register_group("Templates", template::definitions());
    registry.register_group("Preview", preview::definitions());
    registry.register_group("Fill-out", fill::definitions());
    registry.register_group("Backups", backup::definitions());
    registry.register_group("System", system::definitions());
}
