// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

pub mod accel;
pub mod angle;
pub mod bot;
pub mod drive;
pub mod encoder;
pub mod gyro;
pub mod link;
pub mod motor;
pub mod odometry;
pub mod rangefinder;
pub mod reflectance;
pub mod servo;
pub mod wire;
