// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial(env)]
fn expands_set_variable() {
    std::env::set_var("VF_ENV_TEST_VAR", "value-123");
    assert_eq!(expand_env_refs("token=${VF_ENV_TEST_VAR}"), "token=value-123");
    std::env::remove_var("VF_ENV_TEST_VAR");
}

#[test]
#[serial(env)]
fn unset_variable_expands_empty() {
    std::env::remove_var("VF_ENV_TEST_UNSET");
    assert_eq!(expand_env_refs("x=${VF_ENV_TEST_UNSET}!"), "x=!");
}

#[test]
fn plain_values_pass_through() {
    assert_eq!(expand_env_refs("no refs here"), "no refs here");
    // bare $VAR (without braces) is not expanded
    assert_eq!(expand_env_refs("$HOME"), "$HOME");
}
