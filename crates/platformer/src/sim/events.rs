use strum_macros::{EnumIter, IntoStaticStr};

/// One-shot sound triggers. The static name is the clip name the audio
/// collaborator loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SoundEffect {
    Jump,
    Coin,
    PowerUp,
    PowerDown,
    Stomp,
    Death,
    BlockHit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum MusicTrack {
    Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play(SoundEffect),
    Loop(MusicTrack),
    Stop(MusicTrack),
    SetEnabled(bool),
}

/// Audio commands raised during a tick, drained by the host afterwards.
#[derive(Debug, Default)]
pub struct AudioQueue {
    commands: Vec<AudioCommand>,
}

impl AudioQueue {
    pub fn play(&mut self, effect: SoundEffect) {
        self.commands.push(AudioCommand::Play(effect));
    }

    pub fn push(&mut self, command: AudioCommand) {
        self.commands.push(command);
    }

    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn contains(&self, command: AudioCommand) -> bool {
        self.commands.contains(&command)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn sound_names_match_clip_names() {
        let names: Vec<&'static str> = SoundEffect::iter().map(Into::into).collect();
        assert_eq!(
            names,
            ["jump", "coin", "powerup", "powerdown", "stomp", "death", "blockhit"]
        );
        let theme: &'static str = MusicTrack::Theme.into();
        assert_eq!(theme, "theme");
    }

    #[test]
    fn drain_empties_queue() {
        let mut queue = AudioQueue::default();
        queue.play(SoundEffect::Jump);
        queue.push(AudioCommand::Loop(MusicTrack::Theme));
        assert!(queue.contains(AudioCommand::Play(SoundEffect::Jump)));

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.drain().is_empty());
    }
}
