use vergen_gitcl::{Emitter, GitclBuilder};

fn main() -> anyhow::Result<()> {
    // Emits VERGEN_GIT_SHA and VERGEN_GIT_DIRTY for get_version!
    let gitcl = GitclBuilder::default().sha(false).dirty(false).build()?;
    Emitter::default().add_instructions(&gitcl)?.emit()
}
