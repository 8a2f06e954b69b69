//! Tests for the OTP issue/verify services


mod issuer_tests;
