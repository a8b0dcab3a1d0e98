//! Direct EWMH queries over the X protocol.
//!
//! Maximization state is not visible in any of the command-line tools'
//! output, so this one query goes straight to the display server.  Each
//! call opens a short-lived connection; no handle is cached.

use super::backend::X11Error;
use crate::model::WindowId;
use x11rb::protocol::xproto::{Atom, AtomEnum, ConnectionExt};

/// Whether the window carries both `_NET_WM_STATE_MAXIMIZED_VERT` and
/// `_NET_WM_STATE_MAXIMIZED_HORZ` in its `_NET_WM_STATE` property.
pub fn window_is_maximized(id: WindowId) -> Result<bool, X11Error> {
    let (conn, _screen) = x11rb::connect(None)?;

    let state = intern(&conn, b"_NET_WM_STATE")?;
    let vert = intern(&conn, b"_NET_WM_STATE_MAXIMIZED_VERT")?;
    let horz = intern(&conn, b"_NET_WM_STATE_MAXIMIZED_HORZ")?;

    let reply = conn
        .get_property(false, id.0, state, AtomEnum::ATOM, 0, 1024)?
        .reply()?;

    let Some(values) = reply.value32() else {
        return Ok(false);
    };
    let atoms: Vec<Atom> = values.collect();
    Ok(atoms.contains(&vert) && atoms.contains(&horz))
}

fn intern(conn: &impl ConnectionExt, name: &[u8]) -> Result<Atom, X11Error> {
    Ok(conn.intern_atom(false, name)?.reply()?.atom)
}
