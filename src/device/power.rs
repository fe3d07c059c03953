//! OS power plan switching.

use std::io;

/// Activates an operating-system power plan by name.
///
/// Names are the well-known plan labels such as `"Power saver"` or
/// `"High performance"`.
pub trait PowerPlanSwitcher {
    fn activate(&mut self, plan: &str) -> io::Result<()>;
}

impl<T: PowerPlanSwitcher + ?Sized> PowerPlanSwitcher for Box<T> {
    fn activate(&mut self, plan: &str) -> io::Result<()> {
        (**self).activate(plan)
    }
}

impl<T: PowerPlanSwitcher + ?Sized> PowerPlanSwitcher for &mut T {
    fn activate(&mut self, plan: &str) -> io::Result<()> {
        (**self).activate(plan)
    }
}
