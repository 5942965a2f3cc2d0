use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use super::{BuildError, Device, FlushError};
use crate::config::DeviceConfig;
use crate::frame::PixelFrame;
use crate::protocols::raw::{Framing, encode_frame};

/// LED output over a connectionless datagram socket, one datagram per frame.
///
/// The socket is opened eagerly at construction and owned exclusively by
/// this value. `Constructed -> Closed` happens at most once: closing takes
/// the socket out and there is no way back.
pub struct UdpDevice {
    pixel_count: usize,
    target: SocketAddr,
    framing: Framing,
    socket: Option<UdpSocket>,
}

impl UdpDevice {
    /// Resolve the target once, bind a non-blocking socket in the matching
    /// address family, and return the ready device.
    ///
    /// Resolution and socket failures are fatal to construction; validation
    /// happened before any resource was acquired.
    pub fn open(config: DeviceConfig) -> Result<Self, BuildError> {
        let target = resolve_target(&config.ip_address, config.port)?;
        let bind_addr: SocketAddr = if target.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr)?;
        // A send must never stall the render loop; a full OS buffer
        // surfaces as a would-block error and the frame is dropped.
        socket.set_nonblocking(true)?;

        Ok(Self {
            pixel_count: config.pixel_count,
            target,
            framing: Framing {
                prefix: config.data_prefix,
                postfix: config.data_postfix,
                include_indexes: config.include_indexes,
            },
            socket: Some(socket),
        })
    }

    /// Resolved destination address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

impl Device for UdpDevice {
    fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    fn flush(&mut self, frame: &PixelFrame) -> Result<(), FlushError> {
        let socket = self.socket.as_ref().ok_or(FlushError::Closed)?;
        if frame.len() != self.pixel_count {
            return Err(FlushError::FrameSize {
                expected: self.pixel_count,
                actual: frame.len(),
            });
        }
        let payload = encode_frame(&self.framing, frame);
        socket.send_to(&payload, self.target)?;
        Ok(())
    }

    fn close(&mut self) {
        self.socket = None;
    }
}

fn resolve_target(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no addresses resolved for {host}"),
        )
    })
}
