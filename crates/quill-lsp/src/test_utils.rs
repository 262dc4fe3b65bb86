//! Test utilities: a scripted engine and service builders.
