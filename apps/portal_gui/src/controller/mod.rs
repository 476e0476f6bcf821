//! UI-side event and error modeling for the portal GUI.

pub mod events;
