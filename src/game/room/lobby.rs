use crate::game::constants::MAX_PARTICIPANTS;

pub const HOST_SEAT: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyPhase {
    Idle,
    Open { participants: u8 },
    Full,
    InProgress { participants: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The authority left; everything is torn down and the lobby is idle again.
    HostLeft,
    GuestLeft { participants: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error("session is full")]
    SessionFull,
    #[error("session already in progress")]
    InProgress,
    #[error("no session is being hosted")]
    NoSession,
    #[error("session already has a host")]
    AlreadyHosted,
    #[error("only the host can start the session")]
    NotAuthority,
}

/// Seat bookkeeping for one session. Seat 0 is always the host.
#[derive(Debug, Default)]
pub struct Lobby {
    seats: [bool; MAX_PARTICIPANTS],
    started: bool,
}

impl Lobby {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn participants(&self) -> u8 {
        self.seats.iter().filter(|taken| **taken).count() as u8
    }

    pub fn phase(&self) -> LobbyPhase {
        if !self.seats[HOST_SEAT as usize] {
            return LobbyPhase::Idle;
        }
        let participants = self.participants();
        if self.started {
            LobbyPhase::InProgress { participants }
        } else if participants as usize >= MAX_PARTICIPANTS {
            LobbyPhase::Full
        } else {
            LobbyPhase::Open { participants }
        }
    }

    pub fn is_seated(&self, seat: u8) -> bool {
        self.seats.get(seat as usize).copied().unwrap_or(false)
    }

    pub fn seated(&self) -> impl Iterator<Item = u8> + '_ {
        self.seats
            .iter()
            .enumerate()
            .filter(|(_, taken)| **taken)
            .map(|(seat, _)| seat as u8)
    }

    /// Takes the host seat. A solo session skips the lobby and starts at once.
    pub fn open(&mut self, solo: bool) -> Result<u8, AdmissionError> {
        if self.phase() != LobbyPhase::Idle {
            return Err(AdmissionError::AlreadyHosted);
        }
        self.seats = [false; MAX_PARTICIPANTS];
        self.seats[HOST_SEAT as usize] = true;
        self.started = solo;
        Ok(HOST_SEAT)
    }

    /// Seats a guest on the lowest free seat.
    pub fn join(&mut self) -> Result<u8, AdmissionError> {
        match self.phase() {
            LobbyPhase::Idle => Err(AdmissionError::NoSession),
            LobbyPhase::InProgress { .. } => Err(AdmissionError::InProgress),
            LobbyPhase::Full => Err(AdmissionError::SessionFull),
            LobbyPhase::Open { .. } => {
                let seat = self
                    .seats
                    .iter()
                    .position(|taken| !taken)
                    .ok_or(AdmissionError::SessionFull)?;
                self.seats[seat] = true;
                Ok(seat as u8)
            }
        }
    }

    pub fn start(&mut self, seat: u8) -> Result<u8, AdmissionError> {
        if seat != HOST_SEAT {
            return Err(AdmissionError::NotAuthority);
        }
        match self.phase() {
            LobbyPhase::Idle => Err(AdmissionError::NoSession),
            LobbyPhase::InProgress { .. } => Err(AdmissionError::InProgress),
            LobbyPhase::Open { participants } => {
                self.started = true;
                Ok(participants)
            }
            LobbyPhase::Full => {
                self.started = true;
                Ok(self.participants())
            }
        }
    }

    pub fn leave(&mut self, seat: u8) -> Option<Departure> {
        if !self.is_seated(seat) {
            return None;
        }
        if seat == HOST_SEAT {
            *self = Self::default();
            return Some(Departure::HostLeft);
        }
        self.seats[seat as usize] = false;
        Some(Departure::GuestLeft {
            participants: self.participants(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seats_fill_in_order_until_full() {
        let mut lobby = Lobby::new();
        assert_eq!(lobby.phase(), LobbyPhase::Idle);

        assert_eq!(lobby.open(false), Ok(0));
        assert_eq!(lobby.phase(), LobbyPhase::Open { participants: 1 });
        assert_eq!(lobby.join(), Ok(1));
        assert_eq!(lobby.join(), Ok(2));
        assert_eq!(lobby.phase(), LobbyPhase::Full);
    }

    #[test]
    fn third_join_is_rejected_and_count_is_unchanged() {
        let mut lobby = Lobby::new();
        lobby.open(false).unwrap();
        lobby.join().unwrap();
        lobby.join().unwrap();

        assert_eq!(lobby.join(), Err(AdmissionError::SessionFull));
        assert_eq!(lobby.participants(), 3);
        assert_eq!(lobby.seated().filter(|seat| *seat != HOST_SEAT).count(), 2);
    }

    #[test]
    fn joining_needs_a_host() {
        let mut lobby = Lobby::new();
        assert_eq!(lobby.join(), Err(AdmissionError::NoSession));
    }

    #[test]
    fn only_the_host_starts_and_only_once() {
        let mut lobby = Lobby::new();
        lobby.open(false).unwrap();
        lobby.join().unwrap();

        assert_eq!(lobby.start(1), Err(AdmissionError::NotAuthority));
        assert_eq!(lobby.start(HOST_SEAT), Ok(2));
        assert_eq!(lobby.phase(), LobbyPhase::InProgress { participants: 2 });
        assert_eq!(lobby.start(HOST_SEAT), Err(AdmissionError::InProgress));
        assert_eq!(lobby.join(), Err(AdmissionError::InProgress));
    }

    #[test]
    fn full_lobby_can_start() {
        let mut lobby = Lobby::new();
        lobby.open(false).unwrap();
        lobby.join().unwrap();
        lobby.join().unwrap();
        assert_eq!(lobby.start(HOST_SEAT), Ok(3));
    }

    #[test]
    fn guest_departure_reopens_the_seat() {
        let mut lobby = Lobby::new();
        lobby.open(false).unwrap();
        lobby.join().unwrap();
        lobby.join().unwrap();

        assert_eq!(lobby.leave(1), Some(Departure::GuestLeft { participants: 2 }));
        assert_eq!(lobby.phase(), LobbyPhase::Open { participants: 2 });
        assert_eq!(lobby.leave(1), None);
        assert_eq!(lobby.join(), Ok(1));
    }

    #[test]
    fn host_departure_returns_to_idle() {
        let mut lobby = Lobby::new();
        lobby.open(false).unwrap();
        lobby.join().unwrap();
        lobby.start(HOST_SEAT).unwrap();

        assert_eq!(lobby.leave(HOST_SEAT), Some(Departure::HostLeft));
        assert_eq!(lobby.phase(), LobbyPhase::Idle);
        assert_eq!(lobby.participants(), 0);
        assert_eq!(lobby.open(true), Ok(HOST_SEAT));
        assert_eq!(lobby.phase(), LobbyPhase::InProgress { participants: 1 });
    }

    #[test]
    fn second_host_is_rejected() {
        let mut lobby = Lobby::new();
        lobby.open(false).unwrap();
        assert_eq!(lobby.open(false), Err(AdmissionError::AlreadyHosted));
    }
}
