// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod settings;
pub mod timeline;
pub mod schedule;
pub mod applications;
pub mod committee;
pub mod payments;
pub mod schemes;
pub mod budget;
pub mod activity;
pub mod exporter;
pub mod doctor;
