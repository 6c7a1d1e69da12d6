//! Deferred session commands.

use planedrop_physics::Explosion;
use std::collections::VecDeque;

/// Commands that are queued by gesture handling and executed on the next
/// session update.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionCommand {
    Explode(Explosion),
}

/// First-in, first-out queue of commands awaiting execution.
#[derive(Debug)]
pub struct CommandQueue<C> {
    commands: VecDeque<C>,
}

impl<C> CommandQueue<C> {
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    /// Adds the given command to the back of the queue.
    pub fn enqueue_command(&mut self, command: C) {
        self.commands.push_back(command);
    }

    /// Removes and returns all queued commands, in the order they were
    /// enqueued.
    pub fn drain_commands(&mut self) -> impl Iterator<Item = C> + '_ {
        self.commands.drain(..)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Discards all queued commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl<C> Default for CommandQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_drain_commands_in_enqueue_order() {
        let mut queue = CommandQueue::new();
        queue.enqueue_command(1);
        queue.enqueue_command(2);
        queue.enqueue_command(3);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain_commands().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn clearing_should_discard_commands() {
        let mut queue = CommandQueue::new();
        queue.enqueue_command("explode");
        queue.clear();
        assert_eq!(queue.drain_commands().count(), 0);
    }
}
