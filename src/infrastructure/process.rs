//! Child process helpers shared by the subprocess adapters

use std::process::Child;

/// Kill and reap a child that is being abandoned on an error path
///
/// Errors are ignored: the child may already have exited, and the caller is
/// about to report its own error.
pub(crate) fn abandon(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::{Command, Stdio};

    use super::*;

    #[test]
    fn abandoned_child_is_reaped() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();

        abandon(&mut child);

        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn abandoning_an_exited_child_is_harmless() {
        let mut child = Command::new("true").spawn().unwrap();
        child.wait().unwrap();

        abandon(&mut child);
    }
}
