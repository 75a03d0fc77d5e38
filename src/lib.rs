// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Storage authority mapping layer of an ACME certificate authority:
//! converts registrations and challenges to and from their database rows.

pub mod acme;
pub mod errors;
pub mod repository;
pub mod utils;
