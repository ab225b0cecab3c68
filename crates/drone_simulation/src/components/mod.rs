//! ECS Components внешних участников сцены
//!
//! - actors: игрок, за которым следует дрон (EscortedPlayer), и враги (Hostile)
//!
//! Компоненты самого дрона живут в `crate::drone`, оружия — в `crate::weapon`.

pub mod actors;

pub use actors::*;
