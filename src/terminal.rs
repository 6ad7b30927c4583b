use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io;

/// Runs its restore step when dropped, including on early `?` returns and panics.
pub struct RestoreGuard<F: FnMut()> {
    restore: Option<F>,
}

impl<F: FnMut()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self {
            restore: Some(restore),
        }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(mut restore) = self.restore.take() {
            restore();
        }
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// Puts the terminal in raw mode on the alternate screen. Dropping the guard
/// puts it back.
pub fn enter() -> io::Result<RestoreGuard<fn()>> {
    enable_raw_mode()?;
    let guard = RestoreGuard::new(restore_terminal as fn());
    execute!(io::stdout(), EnterAlternateScreen)?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::panic::{self, AssertUnwindSafe};

    fn fails_midway(restored: &Cell<bool>) -> io::Result<()> {
        let _guard = RestoreGuard::new(|| restored.set(true));
        Err(io::Error::other("draw failed"))?;
        Ok(())
    }

    #[test]
    fn test_restores_on_error_return() {
        let restored = Cell::new(false);
        assert!(fails_midway(&restored).is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_restores_on_panic() {
        let restored = Cell::new(false);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = RestoreGuard::new(|| restored.set(true));
            panic!("render bug");
        }));
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn test_restores_exactly_once() {
        let count = Cell::new(0);
        {
            let _guard = RestoreGuard::new(|| count.set(count.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }
}
