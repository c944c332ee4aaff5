//! USB Device subsystem - presents a composite HID device to the host.
//!
//! The RP2040's USB 1.1 Full-Speed controller is driven by `embassy-usb`.
//! We create a **composite device** with three HID interfaces:
//!
//! - Interface 0: Keyboard (boot protocol)
//! - Interface 1: Mouse    (boot protocol)
//! - Interface 2: Consumer control (media keys)
//!
//! The control loop runs on the other core and hands reports over through
//! [`hid_device::REPORTS`]; the writer task forwards each one to its
//! endpoint.

pub mod hid_device;
