// session.rs — Session: a scoped resource around a connected stream.
//
// On construction: connect, then send the startup no-op older firmware
// requires. Release is automatic: `Session` owns the `BlockingStream`, which
// owns the `TcpStream`, so the socket closes on every exit path — success,
// early return, or panic unwind — when `Session` goes out of scope, the same
// guarantee the original gets from its `@contextmanager`'s `finally` block.
// No explicit `Drop` impl is needed or written; one that did nothing would
// just be noise.

use std::net::SocketAddr;

use netdimm_proto::{packet_id, NetDimmError, Packet, HEADER_LEN};
use tracing::{debug, instrument};

use crate::stream::BlockingStream;

pub struct Session {
    stream: BlockingStream,
}

impl Session {
    /// Connect and perform the startup handshake.
    #[instrument(skip_all, fields(addr = %addr))]
    pub fn open(addr: SocketAddr) -> Result<Self, NetDimmError> {
        let mut stream = BlockingStream::connect(addr)?;
        debug!("connected, sending startup no-op");
        let startup = Packet::empty(packet_id::STARTUP, 0x00);
        stream.write_all(&startup.encode())?;
        Ok(Self { stream })
    }

    /// Send a packet with no expected reply.
    pub fn send_packet(&mut self, packet: &Packet) -> Result<(), NetDimmError> {
        self.stream.write_all(&packet.encode())
    }

    /// Receive one packet: header first, then exactly `length` payload bytes.
    pub fn recv_packet(&mut self) -> Result<Packet, NetDimmError> {
        let mut header = [0u8; HEADER_LEN];
        self.stream.read_exact(&mut header)?;
        let (id, flags, length) = netdimm_proto::frame::decode_header(header);
        let data = self.stream.read_vec(length as usize)?;
        Ok(Packet::new(id, flags, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn open_sends_startup_no_op() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut header = [0u8; HEADER_LEN];
            sock.read_exact(&mut header).unwrap();
            let (id, flags, length) = netdimm_proto::frame::decode_header(header);
            assert_eq!(id, packet_id::STARTUP);
            assert_eq!(flags, 0x00);
            assert_eq!(length, 0);
        });

        let session = Session::open(addr).unwrap();
        drop(session);
        server.join().unwrap();
    }

    #[test]
    fn recv_packet_reads_declared_payload_length() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let mut startup_header = [0u8; HEADER_LEN];
            sock.read_exact(&mut startup_header).unwrap();

            let reply = Packet::new(0x18, 0x00, vec![1, 2, 3, 4]);
            sock.write_all(&reply.encode()).unwrap();
        });

        let mut session = Session::open(addr).unwrap();
        let reply = session.recv_packet().unwrap();
        assert_eq!(reply.id, 0x18);
        assert_eq!(reply.data, vec![1, 2, 3, 4]);

        drop(session);
        server.join().unwrap();
    }
}
