//! Board support for the calendar clock on an STM32F103 "Blue Pill"

#![no_std]

pub mod render;
pub mod sampler;
