use contactbook_signals::{Mut, Read};
use tracing::debug;

use crate::types::CurrentView;

/// The requested screen. Every request is accepted.
pub struct NavigationGraph {
    view: Mut<CurrentView>,
}

impl Default for NavigationGraph {
    fn default() -> Self { Self::new() }
}

impl NavigationGraph {
    pub fn new() -> Self { Self { view: Mut::new(CurrentView::Login) } }

    pub fn go_to(&self, view: CurrentView) {
        debug!("navigating to {view:?}");
        self.view.set(view);
    }

    /// Starts at [`CurrentView::Login`]
    pub fn current_view(&self) -> Read<CurrentView> { self.view.read() }

    pub fn dispose(&self) { self.view.close(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactbook_signals::Peek;

    #[test]
    fn starts_at_login_and_accepts_every_view() {
        let navigation = NavigationGraph::new();
        assert_eq!(navigation.current_view().peek(), Some(CurrentView::Login));
        for view in [CurrentView::Register, CurrentView::ContactList, CurrentView::CreateContact, CurrentView::Login] {
            navigation.go_to(view);
            assert_eq!(navigation.current_view().peek(), Some(view));
        }
    }

    #[test]
    fn dispose_closes_the_view() {
        let navigation = NavigationGraph::new();
        let view = navigation.current_view();
        navigation.dispose();
        navigation.dispose();
        assert!(view.is_closed());
        // the last view is still readable
        assert_eq!(view.peek(), Some(CurrentView::Login));
    }
}
