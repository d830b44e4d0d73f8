// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

mod arm;
mod dashboard;
mod deamon;
mod drivetrain;
mod log;
mod state;
mod xrpbot;

use std::{
    env,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket},
    sync::mpsc,
};
use xrplink::{bot::BotRunner, link};
use xrpbot::XrpBot;

/// Port the mode-command deamon listens on.
const DEAMON_PORT: u16 = 7042;

fn main() {
    let host = env::var("XRP_HOST").unwrap_or_else(|_| String::from(XrpBot::DEFAULT_HOST));
    let port = env::var("XRP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(XrpBot::DEFAULT_PORT);

    let socket = UdpSocket::bind("0.0.0.0:0").expect("errors binding the bridge socket are fatal");
    socket
        .connect((host.as_str(), port))
        .expect("errors resolving the bridge address are fatal");

    let link_tx = link::Client::new(
        socket
            .try_clone()
            .expect("errors cloning the bridge socket are fatal"),
        XrpBot::LINK_CYCLE,
    );
    let link_rx = link::Server::new(socket);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let _deamon = deamon::Deamon::new(
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), DEAMON_PORT)),
        vec![cmd_tx],
    )
    .expect("errors binding the deamon port are fatal");

    let bot = XrpBot::new(link_tx, link_rx).expect("errors instantiating the robot are fatal");

    BotRunner::new(bot)
        .expect("errors instantiating GP I/O are fatal")
        .start(cmd_rx)
        .expect("errors running the robot are fatal")
}
