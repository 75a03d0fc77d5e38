// SPDX-FileCopyrightText: 2024 Fondazione LINKS
//
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod challenges_mapper;
pub mod models;
pub mod operations;
pub mod postgres_repo;
pub mod registrations_mapper;
pub mod sql_types;
